// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on the
// dashboard.  Every series-producing function returns an `IndicatorSeries`
// aligned one-to-one with its input: `None` marks the warm-up rows where the
// look-back window is not yet filled.  Short input never panics; it simply
// yields an all-`None` series.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod momentum;
pub mod obv;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use engine::{IndicatorEngine, IndicatorOutput, IndicatorParams, IndicatorRequest, NamedSeries};
pub use momentum::RocWarmup;

/// Indicator values aligned with the source bars; `None` = undefined.
pub type IndicatorSeries = Vec<Option<f64>>;

/// An all-undefined series of length `len`.
pub(crate) fn undefined(len: usize) -> IndicatorSeries {
    vec![None; len]
}

/// Most recent defined value of a series.
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}

#[cfg(test)]
pub(crate) mod test_util {
    /// Assert two optional values agree within `1e-9`.
    pub fn assert_close(actual: Option<f64>, expected: Option<f64>) {
        match (actual, expected) {
            (Some(a), Some(e)) => assert!((a - e).abs() < 1e-9, "got {a}, expected {e}"),
            (None, None) => {}
            _ => panic!("got {actual:?}, expected {expected:?}"),
        }
    }

    /// Number of leading `None` values.
    pub fn warmup_len(series: &[Option<f64>]) -> usize {
        series.iter().take_while(|v| v.is_none()).count()
    }
}
