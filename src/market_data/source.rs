// =============================================================================
// Market-data collaborator interface
// =============================================================================

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::market_data::OhlcvSeries;
use crate::types::{Interval, Period};

/// Descriptive company record shown under the price charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub description: String,
    pub market_cap: String,
}

impl CompanyInfo {
    /// Record used when the provider has nothing (or fails) for `symbol`.
    pub fn fallback(symbol: &str) -> Self {
        Self {
            name: symbol.to_string(),
            description: "No description available".to_string(),
            market_cap: "N/A".to_string(),
        }
    }
}

/// Format a raw market capitalisation in dollars as `$x.xxT`, `$x.xxB` or `$x.xxM`.
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(cap) if cap.is_finite() && cap >= 0.0 => {
            if cap > 1e12 {
                format!("${:.2}T", cap / 1e12)
            } else if cap > 1e9 {
                format!("${:.2}B", cap / 1e9)
            } else {
                format!("${:.2}M", cap / 1e6)
            }
        }
        _ => "N/A".to_string(),
    }
}

/// Source of historical prices and company metadata.
///
/// Implementations must return each symbol's series independently; callers
/// may run several fetches concurrently.
pub trait MarketDataSource: Send + Sync {
    /// Fetch the OHLCV history for `symbol`.  An empty result is an error.
    fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> impl Future<Output = Result<OhlcvSeries, DataError>> + Send;

    /// Fetch company metadata.  Never fails; missing fields fall back to
    /// [`CompanyInfo::fallback`] values.
    fn fetch_company_info(&self, symbol: &str) -> impl Future<Output = CompanyInfo> + Send;
}
