//! Ticker universe: the built-in global equity list and normalization of
//! configured lists.

/// Default universe, grouped by listing market. Order defines output order.
pub const DEFAULT_TICKERS: &[&str] = &[
    // United States
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "JPM", "V", "JNJ", "WMT",
    // China (US listings)
    "BABA", "TCEHY", "PDD", "BIDU", "NIO",
    // South Korea
    "005930.KS", "000660.KS", "035420.KS",
    // France
    "TTE", "LVMUY", "OR.PA", "SAN.PA",
    // Germany
    "SAP", "VOW3.DE", "SIE.DE", "ALV.DE",
    // United Kingdom
    "HSBC", "GSK", "BP", "VOD",
    // Japan
    "TM", "SONY", "7974.T", "6758.T",
    // Canada
    "RY.TO", "TD.TO", "ENB.TO", "CNR.TO",
    // India
    "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS",
    // Brazil
    "VALE3.SA", "PETR4.SA", "ITUB4.SA",
    // Switzerland
    "NESN.SW", "ROG.SW", "NOVN.SW",
    // Australia
    "ASX.AX", "BHP.AX", "NAB.AX",
    // Japan (Toyota, SoftBank, KDDI)
    "7203.T", "9984.T", "9433.T",
];

pub fn default_universe() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

/// Trim, uppercase and dedupe, keeping first-seen order. Blank entries are dropped.
pub fn normalize(tickers: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tickers.len());
    for raw in tickers {
        let t = raw.trim().to_ascii_uppercase();
        if !t.is_empty() && !out.iter().any(|v| v == &t) {
            out.push(t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_has_unique_entries() {
        let all = default_universe();
        assert_eq!(normalize(&all), all);
        assert_eq!(all.len(), 53);
    }

    #[test]
    fn normalize_dedups_and_preserves_order() {
        let raw = vec![
            "or.pa".to_string(),
            " AAPL ".to_string(),
            "OR.PA".to_string(),
            String::new(),
        ];
        assert_eq!(normalize(&raw), vec!["OR.PA".to_string(), "AAPL".to_string()]);
    }
}
