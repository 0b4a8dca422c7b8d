use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::universe;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const DEFAULT_ORDER_FLOW_PATH: &str = "order_flow_data.csv";
pub const DEFAULT_STATIC_DATA_PATH: &str = "stocks_static_data.csv";
pub const DEFAULT_RECORDS_PER_TICKER: usize = 100_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub universe: UniverseConfig,
    pub order_flow: OrderFlowConfig,
    pub static_data: StaticDataConfig,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// `None` selects the built-in universe; a present list is used as written, even empty.
    pub tickers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderFlowConfig {
    pub output_path: PathBuf,
    pub records_per_ticker: usize,
    pub max_price_deviation: f64,
    pub min_volume: u32,
    pub max_volume: u32,
    pub max_step_secs: u32,
    pub seed: Option<u64>,
}

impl Default for OrderFlowConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_ORDER_FLOW_PATH),
            records_per_ticker: DEFAULT_RECORDS_PER_TICKER,
            max_price_deviation: 0.05,
            min_volume: 1,
            max_volume: 10_000,
            max_step_secs: 60,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticDataConfig {
    pub output_path: PathBuf,
}

impl Default for StaticDataConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_STATIC_DATA_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub chart_base_url: String,
    pub summary_base_url: String,
    pub cookie_url: String,
    pub crumb_url: String,
    pub user_agent: String,
    pub request_timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            chart_base_url: "https://query1.finance.yahoo.com".to_string(),
            summary_base_url: "https://query2.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl UniverseConfig {
    /// Configured tickers normalized, or the built-in universe when the key is absent.
    pub fn tickers(&self) -> Vec<String> {
        match &self.tickers {
            Some(configured) => universe::normalize(configured),
            None => universe::default_universe(),
        }
    }
}

impl Config {
    /// Load `config/default.toml` (or `$MOCK_MARKET_CONFIG`), then apply env overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("MOCK_MARKET_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::load_from_path(&config_path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("MOCK_RECORDS_PER_TICKER") {
            self.order_flow.records_per_ticker = raw
                .trim()
                .parse()
                .with_context(|| format!("MOCK_RECORDS_PER_TICKER '{}' is not a count", raw))?;
        }
        if let Ok(raw) = std::env::var("MOCK_SEED") {
            self.order_flow.seed = Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("MOCK_SEED '{}' is not a u64", raw))?,
            );
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let of = &self.order_flow;
        if !(0.0..1.0).contains(&of.max_price_deviation) {
            bail!(
                "order_flow.max_price_deviation must be in [0, 1), got {}",
                of.max_price_deviation
            );
        }
        if of.min_volume == 0 {
            bail!("order_flow.min_volume must be >= 1");
        }
        if of.min_volume > of.max_volume {
            bail!(
                "order_flow.min_volume ({}) exceeds max_volume ({})",
                of.min_volume,
                of.max_volume
            );
        }
        if of.max_step_secs == 0 {
            bail!("order_flow.max_step_secs must be >= 1");
        }
        if self.provider.request_timeout_ms == 0 {
            bail!("provider.request_timeout_ms must be > 0");
        }
        Ok(())
    }
}
