// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
//   %K_t = 100 * (close_t - LL) / (HH - LL)     over the trailing `period` bars
//   %D_t = SMA(%K, smooth)
//
// A window with no range (HH == LL) reads 50, the midpoint.

use serde::Serialize;

use super::sma::calculate_sma_opt;
use super::{undefined, IndicatorSeries};
use crate::market_data::Bar;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StochasticSeries {
    pub k: IndicatorSeries,
    pub d: IndicatorSeries,
}

pub fn calculate_stochastic(bars: &[Bar], period: usize, smooth: usize) -> StochasticSeries {
    let mut k = undefined(bars.len());
    if period > 0 && bars.len() >= period {
        for i in (period - 1)..bars.len() {
            let window = &bars[i + 1 - period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let range = highest - lowest;

            let value = if range == 0.0 {
                50.0
            } else {
                (bars[i].close - lowest) / range * 100.0
            };
            k[i] = value.is_finite().then_some(value);
        }
    }

    let d = calculate_sma_opt(&k, smooth);
    StochasticSeries { k, d }
}
