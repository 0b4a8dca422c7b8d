use serde::Deserialize;
use serde_json::Value;

/// Error body shared by the chart and quoteSummary endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct YahooErrorBody {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Chart response (GET /v8/finance/chart/{ticker}).
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<YahooErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: Option<ChartMeta>,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Option<ChartIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

/// Per-bar OHLCV arrays; holidays and halted sessions show up as nulls.
#[derive(Debug, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// quoteSummary response (GET /v10/finance/quoteSummary/{ticker}).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryEnvelope {
    #[serde(default)]
    pub result: Option<Vec<serde_json::Map<String, Value>>>,
    #[serde(default)]
    pub error: Option<YahooErrorBody>,
}

/// Envelope returned on auth failures (e.g. an invalid crumb).
#[derive(Debug, Deserialize)]
pub struct FinanceErrorResponse {
    pub finance: FinanceErrorEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct FinanceErrorEnvelope {
    #[serde(default)]
    pub error: Option<YahooErrorBody>,
}
