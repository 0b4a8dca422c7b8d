#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use mock_market_data::error::AppError;
use mock_market_data::provider::{MarketDataProvider, ProviderInfo};

/// In-memory provider: tickers without a scripted price or info fail as unknown.
#[derive(Default)]
pub struct ScriptedProvider {
    pub prices: HashMap<String, f64>,
    pub infos: HashMap<String, ProviderInfo>,
    pub slow: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn with_price(mut self, ticker: &str, price: f64) -> Self {
        self.prices.insert(ticker.to_string(), price);
        self
    }

    pub fn with_info(mut self, ticker: &str, info: ProviderInfo) -> Self {
        self.infos.insert(ticker.to_string(), info);
        self
    }

    /// Calls for this ticker hang far beyond any test timeout.
    pub fn with_slow(mut self, ticker: &str) -> Self {
        self.slow.push(ticker.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn stall_if_slow(&self, ticker: &str) {
        self.calls.lock().unwrap().push(ticker.to_string());
        if self.slow.iter().any(|t| t == ticker) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
}

impl MarketDataProvider for ScriptedProvider {
    async fn latest_close(&self, ticker: &str) -> Result<f64, AppError> {
        self.stall_if_slow(ticker).await;
        self.prices
            .get(ticker)
            .copied()
            .ok_or_else(|| AppError::UnknownTicker(ticker.to_string()))
    }

    async fn info(&self, ticker: &str) -> Result<ProviderInfo, AppError> {
        self.stall_if_slow(ticker).await;
        self.infos
            .get(ticker)
            .cloned()
            .ok_or_else(|| AppError::UnknownTicker(ticker.to_string()))
    }
}

pub fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

pub fn temp_csv_path(test_name: &str) -> std::path::PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("mmd-{}-{}.csv", test_name, ts))
}

/// Header plus data rows of a CSV file, parsed with the csv reader.
pub fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("output should be readable");
    let header = reader
        .headers()
        .expect("output should have a header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| {
            r.expect("every row should be complete")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (header, rows)
}
