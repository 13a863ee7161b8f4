// =============================================================================
// Dashboard Configuration — JSON file with environment overrides
// =============================================================================
//
// Every field carries a serde default so that a partial (or empty) JSON file
// still loads.  Environment variables win over the file:
//
//   DASHBOARD_SYMBOLS    comma-separated default comparison cohort
//   DASHBOARD_BIND_ADDR  listen address for the HTTP server
//   DASHBOARD_DATA_URL   base URL of the market-data provider
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::indicators::IndicatorParams;
use crate::market_data::yahoo::DEFAULT_BASE_URL;
use crate::types::{parse_symbols, Interval, Period};

pub const CONFIG_PATH: &str = "dashboard_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec![
        "AAPL".to_string(),
        "MSFT".to_string(),
        "GOOGL".to_string(),
    ]
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_data_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_chart_rows() -> usize {
    100
}

// =============================================================================
// DashboardConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Cohort preselected on the comparison tab.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    #[serde(default)]
    pub period: Period,

    #[serde(default)]
    pub interval: Interval,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the quote provider (no trailing slash needed).
    #[serde(default = "default_data_url")]
    pub data_url: String,

    /// Rows shown on indicator charts (most recent first cut).
    #[serde(default = "default_chart_rows")]
    pub chart_rows: usize,

    #[serde(default)]
    pub indicators: IndicatorParams,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            period: Period::default(),
            interval: Interval::default(),
            bind_addr: default_bind_addr(),
            data_url: default_data_url(),
            chart_rows: default_chart_rows(),
            indicators: IndicatorParams::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// Returns an error when the file is missing or malformed so the caller
    /// can fall back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config from {}", path.display()))?;

        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dashboard config from {}", path.display()))?;
        config.normalize_symbols();

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            period = %config.period,
            interval = %config.interval,
            "dashboard config loaded"
        );

        Ok(config)
    }

    /// Apply `DASHBOARD_*` overrides read through `lookup`.
    ///
    /// Takes a lookup function rather than reading the process environment
    /// directly so tests do not race on global state.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("DASHBOARD_SYMBOLS") {
            let symbols = parse_symbols(&raw);
            if symbols.is_empty() {
                warn!(value = %raw, "DASHBOARD_SYMBOLS has no symbols, keeping configured list");
            } else {
                self.symbols = symbols;
            }
        }
        if let Some(addr) = lookup("DASHBOARD_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(url) = lookup("DASHBOARD_DATA_URL").filter(|s| !s.trim().is_empty()) {
            self.data_url = url.trim().to_string();
        }
        self.normalize_symbols();
    }

    /// Trim, upper-case and de-duplicate the cohort the same way request
    /// input is; an empty result falls back to the default cohort.
    pub fn normalize_symbols(&mut self) {
        self.symbols = parse_symbols(&self.symbols.join(","));
        if self.symbols.is_empty() {
            self.symbols = default_symbols();
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}
