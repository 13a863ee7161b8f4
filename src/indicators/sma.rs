// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (x_{t-W+1} + ... + x_t) / W
//
// Computed with a running sum so the whole series is O(n).
// =============================================================================

use super::{undefined, IndicatorSeries};

/// Trailing mean of `values` over `period` rows.
///
/// The first `period - 1` entries are `None`.  `period == 0` or an input
/// shorter than `period` yields an all-`None` series.
pub fn calculate_sma(values: &[f64], period: usize) -> IndicatorSeries {
    let mut out = undefined(values.len());
    if period == 0 || values.len() < period {
        return out;
    }

    let period_f = period as f64;
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = finite(sum / period_f);

    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = finite(sum / period_f);
    }
    out
}

/// Trailing mean over a series that may itself contain warm-up gaps.
///
/// A value is produced only when every entry in the window is defined.
pub fn calculate_sma_opt(values: &[Option<f64>], period: usize) -> IndicatorSeries {
    let mut out = undefined(values.len());
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let sum: Option<f64> = window.iter().copied().sum();
        out[i] = sum.and_then(|s| finite(s / period as f64));
    }
    out
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_util::{assert_close, warmup_len};

    #[test]
    fn sma_known_values() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(sma.len(), 5);
        assert_eq!(warmup_len(&sma), 2);
        assert_close(sma[2], Some(2.0));
        assert_close(sma[3], Some(3.0));
        assert_close(sma[4], Some(4.0));
    }

    #[test]
    fn sma_short_input_is_all_none() {
        let sma = calculate_sma(&[1.0, 2.0], 20);
        assert_eq!(sma, vec![None, None]);
    }

    #[test]
    fn sma_period_zero() {
        assert!(calculate_sma(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 5).is_empty());
    }

    #[test]
    fn sma_opt_waits_for_full_window() {
        let input = vec![None, Some(3.0), Some(6.0), Some(9.0)];
        let sma = calculate_sma_opt(&input, 3);
        assert_eq!(warmup_len(&sma), 3);
        assert_close(sma[3], Some(6.0));
    }
}
