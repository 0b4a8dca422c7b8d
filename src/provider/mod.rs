pub mod types;
pub mod yahoo;

use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// External market-data collaborator. Both calls fail per ticker independently.
#[allow(async_fn_in_trait)]
pub trait MarketDataProvider {
    /// Most recent closing price over a one trading day window.
    async fn latest_close(&self, ticker: &str) -> Result<f64, AppError>;

    /// Flat keyed reference fields for the ticker.
    async fn info(&self, ticker: &str) -> Result<ProviderInfo, AppError>;
}

impl<P: MarketDataProvider> MarketDataProvider for &P {
    async fn latest_close(&self, ticker: &str) -> Result<f64, AppError> {
        (**self).latest_close(ticker).await
    }

    async fn info(&self, ticker: &str) -> Result<ProviderInfo, AppError> {
        (**self).info(ticker).await
    }
}

/// Keyed reference fields as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderInfo {
    fields: HashMap<String, Value>,
}

impl ProviderInfo {
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Insert only when the key is not present yet.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: Value) {
        self.fields.entry(key.into()).or_insert(value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field rendered as display text. Null and blank strings count as absent;
    /// integral numbers render without a fractional part.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(i.to_string())
                } else if let Some(u) = n.as_u64() {
                    Some(u.to_string())
                } else {
                    let f = n.as_f64()?;
                    if f.fract() == 0.0 && f.abs() < 1e15 {
                        Some(format!("{}", f as i64))
                    } else {
                        Some(f.to_string())
                    }
                }
            }
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// Bound a single provider call; an elapsed deadline maps to `AppError::Timeout`.
pub async fn with_timeout<T, F>(ticker: &str, timeout: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => Err(AppError::Timeout {
            ticker: ticker.to_string(),
            after_ms: timeout.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_renders_numbers_and_blanks() {
        let mut info = ProviderInfo::default();
        info.insert("a", json!(1.5));
        info.insert("b", json!(2.0e9));
        info.insert("c", json!("   "));
        info.insert("d", json!(true));
        assert_eq!(info.text("a").as_deref(), Some("1.5"));
        assert_eq!(info.text("b").as_deref(), Some("2000000000"));
        assert_eq!(info.text("c"), None);
        assert_eq!(info.text("d").as_deref(), Some("true"));
        assert_eq!(info.text("missing"), None);
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut info = ProviderInfo::default();
        info.insert_if_absent("exchange", json!("NMS"));
        info.insert_if_absent("exchange", json!("NasdaqGS"));
        assert_eq!(info.text("exchange").as_deref(), Some("NMS"));
    }

    #[test]
    fn with_timeout_maps_elapsed_deadline() {
        let res: Result<(), AppError> = tokio_test::block_on(async {
            with_timeout("SLOW", Duration::from_millis(50), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await
        });
        match res {
            Err(AppError::Timeout { ticker, after_ms }) => {
                assert_eq!(ticker, "SLOW");
                assert_eq!(after_ms, 50);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
