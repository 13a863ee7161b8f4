// =============================================================================
// Momentum and Rate of Change (ROC)
// =============================================================================
//
//   Momentum_t = close_t - close_{t-N}
//   ROC_t      = (close_t / close_{t-N} - 1) * 100
//
// Positive values indicate upward momentum; negative indicates downward.
// Momentum is undefined for t < N.  ROC's warm-up rows follow an explicit
// `RocWarmup` policy.

use serde::{Deserialize, Serialize};

use super::{undefined, IndicatorSeries};

/// How ROC fills the rows before `N` closes are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RocWarmup {
    /// Compare against the first available close.
    #[default]
    FirstAvailable,
    /// Leave warm-up rows undefined.
    Undefined,
}

/// N-period price difference; `None` for the first `period` rows.
pub fn calculate_momentum(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut out = undefined(closes.len());
    if period == 0 {
        return out;
    }
    for i in period..closes.len() {
        out[i] = Some(closes[i] - closes[i - period]);
    }
    out
}

/// N-period percentage change.
///
/// A zero base price yields 0.0 rather than an infinite value.
pub fn calculate_roc(closes: &[f64], period: usize, warmup: RocWarmup) -> IndicatorSeries {
    let mut out = undefined(closes.len());
    if period == 0 {
        return out;
    }
    for (i, &close) in closes.iter().enumerate() {
        let base = match i.checked_sub(period) {
            Some(j) => closes[j],
            None => match warmup {
                RocWarmup::FirstAvailable => closes[0],
                RocWarmup::Undefined => continue,
            },
        };
        out[i] = Some(if base == 0.0 {
            0.0
        } else {
            (close / base - 1.0) * 100.0
        });
    }
    out
}
