use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

use crate::config::ProviderConfig;
use crate::error::AppError;

use super::types::{
    ChartResponse, FinanceErrorResponse, QuoteSummaryResponse, YahooErrorBody,
};
use super::{MarketDataProvider, ProviderInfo};

/// quoteSummary modules merged into one flat map. Earlier modules win on key clashes.
pub const SUMMARY_MODULES: &[&str] = &[
    "price",
    "quoteType",
    "summaryProfile",
    "assetProfile",
    "defaultKeyStatistics",
    "summaryDetail",
];

pub struct YahooRestClient {
    http: reqwest::Client,
    chart_base_url: String,
    summary_base_url: String,
    cookie_url: String,
    crumb_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooRestClient {
    pub fn new(cfg: &ProviderConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .cookie_store(true)
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            chart_base_url: cfg.chart_base_url.clone(),
            summary_base_url: cfg.summary_base_url.clone(),
            cookie_url: cfg.cookie_url.clone(),
            crumb_url: cfg.crumb_url.clone(),
            crumb: Mutex::new(None),
        })
    }

    fn compact_error_body(body: &str) -> String {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.len() > 180 {
            let cut = (0..=180)
                .rev()
                .find(|i| normalized.is_char_boundary(*i))
                .unwrap_or(0);
            format!("{}...", &normalized[..cut])
        } else {
            normalized
        }
    }

    /// Base URL with path segments appended; tickers like `OR.PA` are percent-encoded as needed.
    pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = Url::parse(base)
            .map_err(|e| AppError::Config(format!("invalid provider url '{}': {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("provider url '{}' cannot be a base", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn crumb(&self) -> Result<String, AppError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Only primes the session cookie; fc.yahoo.com answers 404 regardless.
        if let Err(e) = self.http.get(&self.cookie_url).send().await {
            tracing::debug!(error = %e, "Cookie priming request failed");
        }

        let resp = self.http.get(&self.crumb_url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let crumb = body.trim();
        if !status.is_success() || crumb.is_empty() || crumb.contains(char::is_whitespace) {
            return Err(AppError::ProviderApi {
                code: status.as_u16().to_string(),
                msg: format!(
                    "crumb request rejected: {}",
                    Self::compact_error_body(&body)
                ),
            });
        }

        tracing::debug!("Obtained quoteSummary crumb");
        *cached = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    fn status_error(status: StatusCode, body: &str) -> AppError {
        AppError::ProviderApi {
            code: status.as_u16().to_string(),
            msg: Self::compact_error_body(body),
        }
    }
}

impl MarketDataProvider for YahooRestClient {
    async fn latest_close(&self, ticker: &str) -> Result<f64, AppError> {
        let url = Self::endpoint(&self.chart_base_url, &["v8", "finance", "chart", ticker])?;
        let resp = self
            .http
            .get(url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        // Not-found answers still carry a JSON error envelope, so parse before checking status.
        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => return Err(Self::status_error(status, &body)),
        };
        close_from_chart(ticker, parsed)
    }

    async fn info(&self, ticker: &str) -> Result<ProviderInfo, AppError> {
        let crumb = self.crumb().await?;
        let url = Self::endpoint(
            &self.summary_base_url,
            &["v10", "finance", "quoteSummary", ticker],
        )?;
        let modules = SUMMARY_MODULES.join(",");
        let resp = self
            .http
            .get(url)
            .query(&[("modules", modules.as_str()), ("crumb", crumb.as_str())])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.invalidate_crumb().await;
            let msg = serde_json::from_str::<FinanceErrorResponse>(&body)
                .ok()
                .and_then(|r| r.finance.error)
                .map(|e| e.description)
                .unwrap_or_else(|| Self::compact_error_body(&body));
            return Err(AppError::ProviderApi {
                code: status.as_u16().to_string(),
                msg,
            });
        }

        let parsed: QuoteSummaryResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => return Err(Self::status_error(status, &body)),
        };
        info_from_quote_summary(ticker, parsed)
    }
}

fn api_error(ticker: &str, err: YahooErrorBody) -> AppError {
    if err.code.eq_ignore_ascii_case("Not Found") {
        AppError::UnknownTicker(ticker.to_string())
    } else {
        AppError::ProviderApi {
            code: err.code,
            msg: err.description,
        }
    }
}

/// First non-null positive close of the returned window.
pub fn close_from_chart(ticker: &str, resp: ChartResponse) -> Result<f64, AppError> {
    if let Some(err) = resp.chart.error {
        return Err(api_error(ticker, err));
    }
    let result = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AppError::UnknownTicker(ticker.to_string()))?;

    result
        .indicators
        .and_then(|ind| ind.quote.into_iter().next())
        .and_then(|q| {
            q.close
                .into_iter()
                .flatten()
                .find(|c| c.is_finite() && *c > 0.0)
        })
        .ok_or_else(|| AppError::NoPriceHistory(ticker.to_string()))
}

pub fn info_from_quote_summary(
    ticker: &str,
    resp: QuoteSummaryResponse,
) -> Result<ProviderInfo, AppError> {
    if let Some(err) = resp.quote_summary.error {
        return Err(api_error(ticker, err));
    }
    let modules = resp
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AppError::UnknownTicker(ticker.to_string()))?;

    let mut info = ProviderInfo::default();
    for name in SUMMARY_MODULES {
        let Some(Value::Object(fields)) = modules.get(*name) else {
            continue;
        };
        for (key, value) in fields {
            if let Some(v) = flatten_value(value) {
                info.insert_if_absent(key.clone(), v);
            }
        }
    }

    if info.is_empty() {
        return Err(AppError::UnknownTicker(ticker.to_string()));
    }
    Ok(info)
}

/// `{raw, fmt}` pairs collapse to `raw`; empty objects count as absent.
fn flatten_value(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) if map.contains_key("raw") => map.get("raw").cloned(),
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.clone()),
    }
}
