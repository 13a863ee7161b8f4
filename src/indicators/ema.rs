// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period` closes
// and sits at index `period - 1`.
// =============================================================================

use super::{undefined, IndicatorSeries};

/// Compute the EMA series for `values` with look-back `period`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `values.len() < period` => all `None`
/// - A non-finite intermediate value ends the series; later rows stay `None`
///   because downstream consumers should not trust a broken series.
pub fn calculate_ema(values: &[f64], period: usize) -> IndicatorSeries {
    let mut out = undefined(values.len());
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let sma: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return out;
    }
    out[period - 1] = Some(sma);

    let mut prev_ema = sma;
    for (i, &value) in values.iter().enumerate().skip(period) {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        out[i] = Some(ema);
        prev_ema = ema;
    }

    out
}

/// EMA over the defined run of an indicator series.
///
/// The run starts at the first `Some` and ends at the next `None`; the result
/// is placed back at the matching offsets (used for the MACD signal line).
pub fn calculate_ema_of_series(series: &[Option<f64>], period: usize) -> IndicatorSeries {
    let mut out = undefined(series.len());
    let Some(start) = series.iter().position(Option::is_some) else {
        return out;
    };
    let run: Vec<f64> = series[start..].iter().map_while(|v| *v).collect();

    for (offset, value) in calculate_ema(&run, period).into_iter().enumerate() {
        out[start + offset] = value;
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_util::{assert_close, warmup_len};

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert_eq!(calculate_ema(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn ema_insufficient_data() {
        assert_eq!(calculate_ema(&[1.0, 2.0], 5), vec![None, None]);
    }

    #[test]
    fn ema_period_equals_length() {
        let ema = calculate_ema(&[2.0, 4.0, 6.0], 3);
        assert_eq!(warmup_len(&ema), 2);
        // Should be the SMA = (2+4+6)/3 = 4.0
        assert_close(ema[2], Some(4.0));
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..=10]: SMA seed 3.0, multiplier 1/3.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 5);
        assert_eq!(ema.len(), 10);
        assert_eq!(warmup_len(&ema), 4);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        assert_close(ema[4], Some(expected));
        for (i, &c) in closes.iter().enumerate().skip(5) {
            expected = c * mult + expected * (1.0 - mult);
            assert_close(ema[i], Some(expected));
        }
    }

    #[test]
    fn ema_handles_nan_in_input() {
        let ema = calculate_ema(&[1.0, 2.0, 3.0, f64::NAN, 5.0], 3);
        // Seed at index 2, then the NaN breaks the series.
        assert_eq!(ema.iter().filter(|v| v.is_some()).count(), 1);
        assert!(ema[3].is_none() && ema[4].is_none());
    }

    #[test]
    fn ema_of_series_respects_offset() {
        let series = vec![None, None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let ema = calculate_ema_of_series(&series, 2);
        assert_eq!(warmup_len(&ema), 3);
        assert_close(ema[3], Some(1.5));
        // multiplier 2/3: 3*2/3 + 1.5/3 = 2.5
        assert_close(ema[4], Some(2.5));
    }

    #[test]
    fn ema_of_all_none_series() {
        assert_eq!(calculate_ema_of_series(&[None, None], 3), vec![None, None]);
    }
}
