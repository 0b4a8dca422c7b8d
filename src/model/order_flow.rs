use chrono::NaiveDateTime;
use std::fmt;

use crate::sink::TabularRow;

pub const ORDER_FLOW_HEADER: [&str; 5] = ["ticker", "timestamp", "price", "volume", "action"];
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Buy,
    Sell,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Buy => "BUY",
            OrderAction::Sell => "SELL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(OrderAction::Buy),
            "SELL" => Some(OrderAction::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic trade tick.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFlowEvent {
    pub ticker: String,
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub volume: u32,
    pub action: OrderAction,
}

impl TabularRow for OrderFlowEvent {
    fn header() -> &'static [&'static str] {
        &ORDER_FLOW_HEADER
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.ticker.clone(),
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.2}", self.price),
            self.volume.to_string(),
            self.action.as_str().to_string(),
        ]
    }
}

/// Round half away from zero to two decimal places.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn record_uses_wire_formats() {
        let ev = OrderFlowEvent {
            ticker: "OR.PA".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(7, 5, 3)
                .unwrap(),
            price: 101.5,
            volume: 42,
            action: OrderAction::Sell,
        };
        assert_eq!(
            ev.record(),
            vec!["OR.PA", "2024-03-09 07:05:03", "101.50", "42", "SELL"]
        );
    }

    #[test]
    fn round_price_two_places() {
        assert!((round_price(99.996) - 100.0).abs() < f64::EPSILON);
        assert!((round_price(12.344) - 12.34).abs() < 1e-9);
    }

    #[test]
    fn action_parse_is_exact() {
        assert_eq!(OrderAction::parse("BUY"), Some(OrderAction::Buy));
        assert_eq!(OrderAction::parse("buy"), None);
    }
}
