// =============================================================================
// Statistics Summary — scalar metrics for the metric cards and tables
// =============================================================================
//
// Reduces one OHLCV series to a fixed set of named scalars.  Every index
// lookup and division is guarded:
//   - a metric that needs more rows than exist is `None` ("Insufficient data")
//   - a ratio with a zero denominator degrades to 0.0
// so a ragged or very short series always yields a complete summary.
// =============================================================================

use serde::Serialize;

use crate::indicators::momentum::{calculate_momentum, calculate_roc};
use crate::indicators::returns::{
    annualized_volatility, max_drawdown, mean, percent_returns, sharpe_ratio,
};
use crate::indicators::IndicatorParams;
use crate::market_data::OhlcvSeries;

/// Text shown for a metric without enough data.
pub const INSUFFICIENT_DATA: &str = "Insufficient data";

/// Scalar metrics derived from one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    /// Close of the most recent bar.
    pub latest_price: Option<f64>,
    /// Percent change of the last close versus the previous close.
    pub change_pct: Option<f64>,
    pub latest_volume: Option<f64>,
    /// Mean period return as a fraction.
    pub mean_return: Option<f64>,
    /// Annualised volatility as a fraction (0 with fewer than two returns).
    pub annualized_volatility: f64,
    /// 0 when volatility is 0.
    pub sharpe_ratio: f64,
    /// Fraction in [0, 1].
    pub max_drawdown: f64,
    pub momentum_period: usize,
    /// `close[t] - close[t-N]` at the last bar.
    pub momentum: Option<f64>,
    /// N-period rate of change at the last bar, in percent.
    pub rate_of_change: Option<f64>,
    /// Percent change from the first to the last close.
    pub total_change_pct: Option<f64>,
}

/// Labelled, formatted metric for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

impl MetricCard {
    fn new(label: impl Into<String>, value: String) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl StatisticsSummary {
    pub fn from_series(series: &OhlcvSeries, params: &IndicatorParams) -> Self {
        let closes = series.closes();
        let returns = percent_returns(&closes);
        let period = params.momentum_period;

        let latest_price = closes.last().copied();
        let change_pct = closes
            .len()
            .checked_sub(2)
            .map(|i| pct_change(closes[i], closes[i + 1]));
        let total_change_pct = match (closes.first(), closes.last()) {
            (Some(&first), Some(&last)) => Some(pct_change(first, last)),
            _ => None,
        };

        Self {
            latest_price,
            change_pct,
            latest_volume: series.last().map(|b| b.volume),
            mean_return: mean(&returns),
            annualized_volatility: annualized_volatility(&returns),
            sharpe_ratio: sharpe_ratio(&returns),
            max_drawdown: max_drawdown(&closes),
            momentum_period: period,
            momentum: calculate_momentum(&closes, period).last().copied().flatten(),
            rate_of_change: calculate_roc(&closes, period, params.roc_warmup)
                .last()
                .copied()
                .flatten(),
            total_change_pct,
        }
    }

    /// Cards for the "Statistical Metrics" panel.
    pub fn statistical_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("Daily Returns (Mean)", format_pct(self.mean_return.map(|r| r * 100.0))),
            MetricCard::new(
                "Volatility (Annual)",
                format_pct(Some(self.annualized_volatility * 100.0)),
            ),
            MetricCard::new("Sharpe Ratio", format_number(Some(self.sharpe_ratio))),
            MetricCard::new("Maximum Drawdown", format_pct(Some(self.max_drawdown * 100.0))),
        ]
    }

    /// Cards for the "Momentum Indicators" panel.
    pub fn momentum_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new(
                format!("{}-day Momentum", self.momentum_period),
                format_number(self.momentum),
            ),
            MetricCard::new("Rate of Change", format_pct(self.rate_of_change)),
            MetricCard::new("Price Change (%)", format_pct(self.total_change_pct)),
        ]
    }
}

/// Percent change from `from` to `to`; 0.0 when `from` is zero.
fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to / from - 1.0) * 100.0
    }
}

/// `12.34%`, or the insufficient-data marker.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => INSUFFICIENT_DATA.to_string(),
    }
}

/// `12.34`, or the insufficient-data marker.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => INSUFFICIENT_DATA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::RocWarmup;
    use crate::market_data::series::test_support::series_from_closes;

    fn summary(closes: &[f64]) -> StatisticsSummary {
        StatisticsSummary::from_series(&series_from_closes(closes), &IndicatorParams::default())
    }

    #[test]
    fn empty_series_degrades_everywhere() {
        let s = summary(&[]);
        assert_eq!(s.latest_price, None);
        assert_eq!(s.change_pct, None);
        assert_eq!(s.latest_volume, None);
        assert_eq!(s.mean_return, None);
        assert_eq!(s.annualized_volatility, 0.0);
        assert_eq!(s.sharpe_ratio, 0.0);
        assert_eq!(s.max_drawdown, 0.0);
        assert_eq!(s.momentum, None);
        assert_eq!(s.rate_of_change, None);
        assert_eq!(s.total_change_pct, None);
    }

    #[test]
    fn single_bar_series() {
        let s = summary(&[42.0]);
        assert_eq!(s.latest_price, Some(42.0));
        assert_eq!(s.change_pct, None);
        assert_eq!(s.mean_return, None);
        assert_eq!(s.annualized_volatility, 0.0);
        assert_eq!(s.sharpe_ratio, 0.0);
        assert_eq!(s.total_change_pct, Some(0.0));
        assert_eq!(s.momentum, None);
        // First-available fallback compares the only close with itself.
        assert_eq!(s.rate_of_change, Some(0.0));
    }

    #[test]
    fn series_shorter_than_momentum_window() {
        let s = summary(&[100.0, 102.0, 101.0, 105.0, 103.0]);
        assert_eq!(s.latest_price, Some(103.0));
        let change = s.change_pct.unwrap();
        assert!((change - (103.0 / 105.0 - 1.0) * 100.0).abs() < 1e-9);
        assert_eq!(s.momentum, None);
        assert!((s.rate_of_change.unwrap() - 3.0).abs() < 1e-9);
        assert!((s.total_change_pct.unwrap() - 3.0).abs() < 1e-9);
        assert!((s.max_drawdown - 2.0 / 105.0).abs() < 1e-12);
        assert!(s.annualized_volatility > 0.0);
    }

    #[test]
    fn undefined_roc_policy_reports_insufficient_data() {
        let params = IndicatorParams {
            roc_warmup: RocWarmup::Undefined,
            ..IndicatorParams::default()
        };
        let s = StatisticsSummary::from_series(&series_from_closes(&[1.0, 2.0]), &params);
        assert_eq!(s.rate_of_change, None);
    }

    #[test]
    fn long_series_defines_momentum() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let s = summary(&closes);
        assert_eq!(s.momentum, Some(20.0));
        // 30 vs 10 => +200%
        assert!((s.rate_of_change.unwrap() - 200.0).abs() < 1e-9);
        assert_eq!(s.max_drawdown, 0.0);
    }

    #[test]
    fn zero_previous_close_does_not_divide() {
        let s = summary(&[0.0, 5.0]);
        assert_eq!(s.change_pct, Some(0.0));
        assert_eq!(s.total_change_pct, Some(0.0));
    }

    #[test]
    fn flat_series_has_zero_sharpe() {
        let s = summary(&[50.0; 30]);
        assert_eq!(s.annualized_volatility, 0.0);
        assert_eq!(s.sharpe_ratio, 0.0);
    }

    #[test]
    fn cards_format_values() {
        let s = summary(&[100.0, 102.0, 101.0, 105.0, 103.0]);
        let stats = s.statistical_cards();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].label, "Daily Returns (Mean)");
        assert!(stats[0].value.ends_with('%'));
        assert_eq!(stats[3].value, "1.90%");

        let momentum = s.momentum_cards();
        assert_eq!(momentum[0].label, "20-day Momentum");
        assert_eq!(momentum[0].value, INSUFFICIENT_DATA);
        assert_eq!(momentum[2].value, "3.00%");
    }

    #[test]
    fn formatters() {
        assert_eq!(format_pct(Some(1.234)), "1.23%");
        assert_eq!(format_number(Some(-0.5)), "-0.50");
        assert_eq!(format_pct(None), INSUFFICIENT_DATA);
    }
}
