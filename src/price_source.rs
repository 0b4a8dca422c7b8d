use std::time::Duration;

use crate::provider::{with_timeout, MarketDataProvider};

/// Outcome of one price lookup. `Unavailable` carries the cause for the skip report.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceResolution {
    Price(f64),
    Unavailable(String),
}

/// Resolves the anchor price for a ticker. Never fails: provider errors,
/// timeouts and non-positive prices all become `Unavailable`. One attempt per call.
pub struct ReferencePriceSource<P: MarketDataProvider> {
    provider: P,
    timeout: Duration,
}

impl<P: MarketDataProvider> ReferencePriceSource<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn resolve(&self, ticker: &str) -> PriceResolution {
        match with_timeout(ticker, self.timeout, self.provider.latest_close(ticker)).await {
            Ok(price) if price.is_finite() && price > 0.0 => {
                tracing::debug!(ticker, price, "Resolved reference price");
                PriceResolution::Price(price)
            }
            Ok(price) => {
                tracing::warn!(ticker, price, "Provider returned an unusable price");
                PriceResolution::Unavailable(format!("unusable price {}", price))
            }
            Err(e) => {
                tracing::warn!(ticker, error = %e, "Could not retrieve price");
                PriceResolution::Unavailable(e.to_string())
            }
        }
    }
}
