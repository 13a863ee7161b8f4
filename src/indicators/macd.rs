// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   line      = EMA(fast) - EMA(slow)
//   signal    = EMA(signal_period) of the defined part of `line`
//   histogram = line - signal
//
// Standard parameters: 12 / 26 / 9.  With those the line starts at index 25
// and the signal/histogram at index 33.
// =============================================================================

use serde::Serialize;

use super::ema::{calculate_ema, calculate_ema_of_series};
use super::IndicatorSeries;

/// Aligned MACD output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let line: IndicatorSeries = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = calculate_ema_of_series(&line, signal);
    let histogram = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| Some((*l)? - (*s)?))
        .collect();

    MacdSeries {
        line,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_util::{assert_close, warmup_len};

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn macd_standard_warmup() {
        let macd = calculate_macd(&wave(60), 12, 26, 9);
        assert_eq!(macd.line.len(), 60);
        assert_eq!(warmup_len(&macd.line), 25);
        assert_eq!(warmup_len(&macd.signal), 33);
        assert_eq!(warmup_len(&macd.histogram), 33);
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let macd = calculate_macd(&wave(60), 12, 26, 9);
        for i in 33..60 {
            assert_close(
                macd.histogram[i],
                Some(macd.line[i].unwrap() - macd.signal[i].unwrap()),
            );
        }
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let macd = calculate_macd(&[50.0; 40], 12, 26, 9);
        assert_close(macd.line[39], Some(0.0));
        assert_close(macd.histogram[39], Some(0.0));
    }

    #[test]
    fn macd_short_series_is_undefined() {
        let macd = calculate_macd(&wave(20), 12, 26, 9);
        assert!(macd.line.iter().all(Option::is_none));
        assert!(macd.signal.iter().all(Option::is_none));
    }

    #[test]
    fn macd_rising_series_is_positive() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let macd = calculate_macd(&closes, 12, 26, 9);
        assert!(macd.line[59].unwrap() > 0.0);
    }
}
