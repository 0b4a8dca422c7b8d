use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("provider API error (code {code}): {msg}")]
    ProviderApi { code: String, msg: String },

    #[error("no price history returned for {0}")]
    NoPriceHistory(String),

    #[error("unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("request for {ticker} timed out after {after_ms}ms")]
    Timeout { ticker: String, after_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
