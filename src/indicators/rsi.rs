// =============================================================================
// RSI — Wilder-smoothed relative strength
// =============================================================================
//
// For each close-to-close change split into a gain part and a loss part:
//
//   seed      mean gain / mean loss over the first `period` changes
//   update    avg = (avg * (period - 1) + x) / period
//   value     100 - 100 / (1 + avg_gain / avg_loss)
//
// `period` changes need `period + 1` closes, so index `period` is the first
// defined value.  Zones: >= 70 overbought, <= 30 oversold.
// =============================================================================

use super::{last_defined, undefined, IndicatorSeries};

/// Running Wilder averages of gains and losses.
struct WilderAverages {
    gain: f64,
    loss: f64,
    period: f64,
}

impl WilderAverages {
    fn seed(changes: &[f64]) -> Self {
        let period = changes.len() as f64;
        let gain: f64 = changes.iter().filter(|c| **c > 0.0).sum();
        let loss: f64 = changes.iter().filter(|c| **c < 0.0).map(|c| -c).sum();
        Self {
            gain: gain / period,
            loss: loss / period,
            period,
        }
    }

    fn update(&mut self, change: f64) {
        let keep = self.period - 1.0;
        self.gain = (self.gain * keep + change.max(0.0)) / self.period;
        self.loss = (self.loss * keep + (-change).max(0.0)) / self.period;
    }

    /// 50 when nothing moved, 100 with no losses; `None` if non-finite.
    fn rsi(&self) -> Option<f64> {
        let value = match (self.gain == 0.0, self.loss == 0.0) {
            (true, true) => 50.0,
            (_, true) => 100.0,
            _ => 100.0 - 100.0 / (1.0 + self.gain / self.loss),
        };
        value.is_finite().then_some(value)
    }
}

/// RSI aligned with `closes`.
///
/// All `None` when `period` is 0 or there are fewer than `period + 1`
/// closes.  A non-finite reading ends the series.
pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut out = undefined(closes.len());
    if period == 0 || closes.len() <= period {
        return out;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let mut averages = WilderAverages::seed(&changes[..period]);

    // changes[i - 1] moves close[i - 1] to close[i].
    for i in period..closes.len() {
        if i > period {
            averages.update(changes[i - 1]);
        }
        match averages.rsi() {
            Some(v) => out[i] = Some(v),
            None => break,
        }
    }
    out
}

/// Zone of an RSI reading.
pub fn rsi_label(value: f64) -> &'static str {
    match value {
        v if v >= 70.0 => "OVERBOUGHT",
        v if v <= 30.0 => "OVERSOLD",
        _ => "NEUTRAL",
    }
}

/// Latest RSI with its zone.
pub fn current_rsi(closes: &[f64], period: usize) -> Option<(f64, &'static str)> {
    last_defined(&calculate_rsi(closes, period)).map(|v| (v, rsi_label(v)))
}
