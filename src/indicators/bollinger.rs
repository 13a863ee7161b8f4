// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the population standard deviation of
// the window.  The Band Width (BBW) is the normalised distance:
//   BBW = (upper - lower) / middle * 100.

use serde::Serialize;

use super::{undefined, IndicatorSeries};

/// Band values for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// `None` when the middle band is zero.
    pub width: Option<f64>,
}

/// Aligned band series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerSeries {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
    pub width: IndicatorSeries,
}

/// Bands for a single full window of closes.
fn bands_for_window(window: &[f64], num_std: f64) -> Option<BollingerPoint> {
    if window.is_empty() {
        return None;
    }
    let n = window.len() as f64;
    let middle = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;
    if !(upper.is_finite() && lower.is_finite()) {
        return None;
    }

    let width = if middle == 0.0 {
        None
    } else {
        Some((upper - lower) / middle * 100.0).filter(|w| w.is_finite())
    };

    Some(BollingerPoint {
        upper,
        middle,
        lower,
        width,
    })
}

/// Calculate Bollinger Bands over every trailing `period` window.
///
/// The first `period - 1` rows are `None` in every band.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerSeries {
    let len = closes.len();
    let mut bands = BollingerSeries {
        upper: undefined(len),
        middle: undefined(len),
        lower: undefined(len),
        width: undefined(len),
    };
    if period == 0 || len < period {
        return bands;
    }

    for i in (period - 1)..len {
        if let Some(p) = bands_for_window(&closes[i + 1 - period..=i], num_std) {
            bands.upper[i] = Some(p.upper);
            bands.middle[i] = Some(p.middle);
            bands.lower[i] = Some(p.lower);
            bands.width[i] = p.width;
        }
    }
    bands
}

/// Bands for the most recent window only.
pub fn current_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerPoint> {
    if period == 0 || closes.len() < period {
        return None;
    }
    bands_for_window(&closes[closes.len() - period..], num_std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_util::{assert_close, warmup_len};

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = current_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert!(bb.width.unwrap() > 0.0);
    }

    #[test]
    fn bollinger_known_values() {
        // Window [1,2,3]: mean 2, population σ = sqrt(2/3).
        let bands = calculate_bollinger(&[1.0, 2.0, 3.0], 3, 2.0);
        let sigma = (2.0_f64 / 3.0).sqrt();
        assert_close(bands.middle[2], Some(2.0));
        assert_close(bands.upper[2], Some(2.0 + 2.0 * sigma));
        assert_close(bands.lower[2], Some(2.0 - 2.0 * sigma));
    }

    #[test]
    fn bollinger_series_warmup() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let bands = calculate_bollinger(&closes, 20, 2.0);
        assert_eq!(bands.middle.len(), 30);
        assert_eq!(warmup_len(&bands.middle), 19);
        assert_eq!(warmup_len(&bands.upper), 19);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bands = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert!(bands.middle.iter().all(Option::is_none));
        assert!(current_bollinger(&[1.0, 2.0, 3.0], 20, 2.0).is_none());
    }

    #[test]
    fn bollinger_flat() {
        let bb = current_bollinger(&[100.0; 20], 20, 2.0).unwrap();
        assert_close(bb.width, Some(0.0));
        assert_eq!(bb.upper, bb.lower);
    }

    #[test]
    fn bollinger_zero_middle_has_no_width() {
        let bands = calculate_bollinger(&[-1.0, 1.0], 2, 2.0);
        assert_close(bands.middle[1], Some(0.0));
        assert!(bands.width[1].is_none());
        assert!(bands.upper[1].is_some());
    }
}
