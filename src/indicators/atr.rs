// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR_0 = H - L                        (no previous close yet)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_{W-1} = SMA of the first `period` TR values
//   ATR_t     = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// Default period: 14
// =============================================================================

use super::{undefined, IndicatorSeries};
use crate::market_data::Bar;

/// True range of every bar, aligned with the input.
pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            // f64::max ignores NaN, so a broken bar must be flagged explicitly.
            if !(bar.high.is_finite() && bar.low.is_finite()) {
                return f64::NAN;
            }
            let hl = bar.high - bar.low;
            match i.checked_sub(1).map(|p| bars[p].close) {
                Some(prev_close) => {
                    let hc = (bar.high - prev_close).abs();
                    let lc = (bar.low - prev_close).abs();
                    hl.max(hc).max(lc)
                }
                None => hl,
            }
        })
        .collect()
}

/// Compute the ATR series from OHLCV bars (oldest first).
///
/// The first `period - 1` entries are `None`.  Fewer than `period` bars,
/// `period == 0`, or a non-finite seed yield an all-`None` series; a
/// non-finite value later on ends the series.
pub fn calculate_atr(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut out = undefined(bars.len());
    if period == 0 || bars.len() < period {
        return out;
    }

    let tr_values = true_ranges(bars);

    // --- Seed ATR with SMA of first `period` TR values ---------------------
    let seed: f64 = tr_values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return out;
    }
    out[period - 1] = Some(seed);

    // --- Wilder's smoothing for remaining TR values ------------------------
    let period_f = period as f64;
    let mut atr = seed;
    for (i, &tr) in tr_values.iter().enumerate().skip(period) {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        if !atr.is_finite() {
            break;
        }
        out[i] = Some(atr);
    }

    out
}

/// Latest ATR as a percentage of the latest close.
///
/// Useful for comparing volatility across symbols with different price scales.
pub fn current_atr_pct(bars: &[Bar], period: usize) -> Option<f64> {
    let atr = calculate_atr(bars, period).last().copied().flatten()?;
    let last_close = bars.last()?.close;
    if last_close == 0.0 {
        return None;
    }
    Some((atr / last_close) * 100.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_util::{assert_close, warmup_len};
    use crate::market_data::series::test_support::bar;

    /// Build a test bar with the given OHLC values.
    fn candle(day: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            open,
            high,
            low,
            close,
            ..bar(day, close)
        }
    }

    #[test]
    fn atr_period_zero() {
        let bars: Vec<Bar> = (0..20).map(|d| candle(d, 100.0, 105.0, 95.0, 102.0)).collect();
        assert!(calculate_atr(&bars, 0).iter().all(Option::is_none));
    }

    #[test]
    fn atr_insufficient_data() {
        let bars: Vec<Bar> = (0..10).map(|d| candle(d, 100.0, 105.0, 95.0, 102.0)).collect();
        let atr = calculate_atr(&bars, 14);
        assert_eq!(atr.len(), 10);
        assert!(atr.iter().all(Option::is_none));
    }

    #[test]
    fn atr_warmup_is_period_minus_one() {
        let bars: Vec<Bar> = (0..20).map(|d| candle(d, 100.0, 105.0, 95.0, 100.0)).collect();
        let atr = calculate_atr(&bars, 14);
        assert_eq!(warmup_len(&atr), 13);
        // Constant range of 10 and closes inside the range => ATR = 10.
        assert_close(atr[19], Some(10.0));
    }

    #[test]
    fn atr_exact_minimum_data() {
        let bars = vec![
            candle(0, 100.0, 102.0, 98.0, 101.0),
            candle(1, 101.0, 104.0, 99.0, 103.0),
            candle(2, 103.0, 106.0, 100.0, 105.0),
        ];
        let atr = calculate_atr(&bars, 3);
        // TR = [4, 5, 6] => seed 5.
        assert_close(atr[2], Some(5.0));
    }

    #[test]
    fn atr_true_range_uses_prev_close() {
        let bars = vec![
            candle(0, 100.0, 105.0, 95.0, 95.0),  // close at low
            candle(1, 110.0, 115.0, 108.0, 112.0), // gap up: |115-95|=20 > 115-108=7
        ];
        let tr = true_ranges(&bars);
        assert_eq!(tr, vec![10.0, 20.0]);
    }

    #[test]
    fn atr_increasing_volatility() {
        let mut bars = vec![candle(0, 100.0, 101.0, 99.0, 100.0)];
        for i in 1..30 {
            let spread = 1.0 + i as f64 * 0.5;
            bars.push(candle(i, 100.0, 100.0 + spread, 100.0 - spread, 100.0));
        }
        let atr = calculate_atr(&bars, 5).last().copied().flatten().unwrap();
        assert!(atr > 5.0, "expected ATR > 5.0 for increasing vol, got {atr}");
    }

    #[test]
    fn atr_nan_ends_series() {
        let bars = vec![
            candle(0, 100.0, 105.0, 95.0, 100.0),
            candle(1, 100.0, 105.0, 95.0, 100.0),
            candle(2, 100.0, 105.0, 95.0, 100.0),
            candle(3, 100.0, f64::NAN, 95.0, 100.0),
            candle(4, 100.0, 105.0, 95.0, 100.0),
        ];
        let atr = calculate_atr(&bars, 3);
        assert!(atr[2].is_some());
        assert!(atr[3].is_none() && atr[4].is_none());
    }

    #[test]
    fn atr_pct_relative_to_close() {
        let bars: Vec<Bar> = (0..20).map(|d| candle(d, 100.0, 105.0, 95.0, 100.0)).collect();
        assert_close(current_atr_pct(&bars, 14), Some(10.0));
        assert!(current_atr_pct(&[], 14).is_none());
    }
}
