// =============================================================================
// Application State — shared across request handlers
// =============================================================================
//
// Configuration and the data source are fixed for the life of the process;
// the only mutable piece is a lock-free counter of analyses served.  Each
// request works on its own fetched series, so no locks are needed.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::config::DashboardConfig;
use crate::market_data::MarketDataSource;

/// Shared via `Arc<AppState<S>>`.
pub struct AppState<S> {
    pub config: DashboardConfig,
    pub source: S,
    started_at: Instant,
    served: AtomicU64,
}

impl<S: MarketDataSource> AppState<S> {
    pub fn new(config: DashboardConfig, source: S) -> Self {
        Self {
            config,
            source,
            started_at: Instant::now(),
            served: AtomicU64::new(0),
        }
    }

    /// Count one completed analysis or comparison.  Returns the new total.
    pub fn record_served(&self) -> u64 {
        self.served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::test_support::StubSource;

    #[test]
    fn served_counter_increments() {
        let state = AppState::new(DashboardConfig::default(), StubSource::new(&[]));
        assert_eq!(state.served(), 0);
        assert_eq!(state.record_served(), 1);
        assert_eq!(state.record_served(), 2);
        assert_eq!(state.served(), 2);
    }
}
