use crate::provider::ProviderInfo;
use crate::sink::TabularRow;

pub const NOT_AVAILABLE: &str = "N/A";

pub const STATIC_REFERENCE_HEADER: [&str; 9] = [
    "ticker",
    "company_name",
    "shares_outstanding",
    "exchange",
    "index",
    "sector",
    "industry",
    "country",
    "ipo_date",
];

/// Static reference data for one ticker. `None` fields render as `N/A`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticReferenceRecord {
    pub ticker: String,
    pub company_name: Option<String>,
    pub shares_outstanding: Option<String>,
    pub exchange: Option<String>,
    pub index: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub ipo_date: Option<String>,
}

impl StaticReferenceRecord {
    pub fn from_info(ticker: &str, info: &ProviderInfo) -> Self {
        Self {
            ticker: ticker.to_string(),
            company_name: info.text("longName"),
            shares_outstanding: info.text("sharesOutstanding"),
            exchange: info.text("exchange"),
            index: info.text("index"),
            sector: info.text("sector"),
            industry: info.text("industry"),
            country: info.text("country"),
            ipo_date: info.text("ipoExpectedDate"),
        }
    }
}

fn or_na(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl TabularRow for StaticReferenceRecord {
    fn header() -> &'static [&'static str] {
        &STATIC_REFERENCE_HEADER
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.ticker.clone(),
            or_na(&self.company_name),
            or_na(&self.shares_outstanding),
            or_na(&self.exchange),
            or_na(&self.index),
            or_na(&self.sector),
            or_na(&self.industry),
            or_na(&self.country),
            or_na(&self.ipo_date),
        ]
    }
}
