use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Fixed USD→EUR rate: 1 USD = 0.8462 EUR.
pub const DEFAULT_USD_TO_EUR: f64 = 0.8462;

/// Dashboard configuration, read from a TOML file and overridden by the environment.
///
/// Every section has defaults, so an empty file (or no file) is a valid config
/// that runs against an in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub fx: FxSettings,
    pub asset_classes: AssetClassSettings,
    pub logging: LoggingSettings,
}

/// Which holding store backs the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,

    /// JSON file for the `file` backend
    pub path: Option<PathBuf>,

    /// Base URL of the REST backend (e.g. "https://xyz.supabase.co")
    pub url: Option<String>,

    /// Sent as `apikey` and bearer token when present
    pub api_key: Option<String>,

    /// Remote table name
    pub table: String,

    /// Request timeout for the REST backend
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: None,
            url: None,
            api_key: None,
            table: "holdings".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxSettings {
    /// EUR value of one USD
    pub usd_to_eur: f64,

    /// EUR value of one GBP. When unset, GBP amounts are shown unconverted.
    pub gbp_to_eur: Option<f64>,
}

impl Default for FxSettings {
    fn default() -> Self {
        Self {
            usd_to_eur: DEFAULT_USD_TO_EUR,
            gbp_to_eur: None,
        }
    }
}

/// Ticker membership lists for the asset-class breakdown.
///
/// "Other Stocks" and "Cash" have no list: cash is the CASH ticker and
/// everything unlisted is an other stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetClassSettings {
    pub etfs: Vec<String>,
    pub tech: Vec<String>,
    pub commodities: Vec<String>,
}

impl Default for AssetClassSettings {
    fn default() -> Self {
        Self {
            etfs: vec!["VUAA".into(), "NQSE".into()],
            tech: vec![
                "NVDA".into(),
                "AAPL".into(),
                "GOOG".into(),
                "AMZN".into(),
                "TSM".into(),
                "AVGO".into(),
            ],
            commodities: vec!["XAU".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. "info" or "portfolio_dashboard_core=debug"
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file, then apply environment overrides.
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let mut settings = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            toml::from_str::<Settings>(&text)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Settings::default()
        };
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Override selected values from environment variables.
    ///
    /// Takes a lookup function so tests don't have to mutate the process env.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PORTFOLIO_STORE_URL") {
            self.store.url = Some(url);
            self.store.backend = StoreBackend::Rest;
        }
        if let Some(key) = lookup("PORTFOLIO_STORE_API_KEY") {
            self.store.api_key = Some(key);
        }
        if let Some(path) = lookup("PORTFOLIO_STORE_PATH") {
            self.store.path = Some(PathBuf::from(path));
            if self.store.backend == StoreBackend::Memory {
                self.store.backend = StoreBackend::File;
            }
        }
        if let Some(level) = lookup("PORTFOLIO_LOG") {
            self.logging.level = level;
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.fx.usd_to_eur.is_finite() && self.fx.usd_to_eur > 0.0) {
            return Err(CoreError::Config(format!(
                "fx.usd_to_eur must be a positive number, got {}",
                self.fx.usd_to_eur
            )));
        }
        if let Some(rate) = self.fx.gbp_to_eur {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(CoreError::Config(format!(
                    "fx.gbp_to_eur must be a positive number, got {rate}"
                )));
            }
        }

        if self.store.table.trim().is_empty() {
            return Err(CoreError::Config("store.table must not be empty".into()));
        }
        match self.store.backend {
            StoreBackend::Rest if self.store.url.as_deref().map_or(true, |u| u.trim().is_empty()) => {
                return Err(CoreError::Config("store.url is required for the rest backend".into()));
            }
            StoreBackend::File if self.store.path.is_none() => {
                return Err(CoreError::Config("store.path is required for the file backend".into()));
            }
            _ => {}
        }

        self.asset_classes.validate()
    }
}

impl AssetClassSettings {
    /// Membership lists must not overlap, and none may claim the CASH ticker,
    /// otherwise a holding would be counted in two buckets.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen: HashSet<String> = HashSet::new();
        let lists = [("etfs", &self.etfs), ("tech", &self.tech), ("commodities", &self.commodities)];
        for (list_name, tickers) in lists {
            for ticker in tickers {
                let upper = ticker.trim().to_uppercase();
                if upper == crate::models::holding::CASH_TICKER {
                    return Err(CoreError::Config(format!(
                        "asset_classes.{list_name} must not contain the CASH ticker"
                    )));
                }
                if !seen.insert(upper.clone()) {
                    return Err(CoreError::Config(format!(
                        "ticker {upper} appears in more than one asset class (found again in asset_classes.{list_name})"
                    )));
                }
            }
        }
        Ok(())
    }
}
