// =============================================================================
// Page views — everything one dashboard tab needs, in one payload
// =============================================================================

use std::collections::HashMap;

use serde::Serialize;

use crate::comparison::{ComparisonReport, MetricsTable, SymbolFailure};
use crate::indicators::atr::current_atr_pct;
use crate::indicators::bollinger::current_bollinger;
use crate::indicators::rsi::current_rsi;
use crate::indicators::{IndicatorEngine, IndicatorParams};
use crate::market_data::{CompanyInfo, OhlcvSeries};
use crate::presentation::builders::{comparison_chart, indicator_charts, price_chart, volume_comparison_chart};
use crate::presentation::ChartSpec;
use crate::statistics::{format_number, format_pct, MetricCard, StatisticsSummary};
use crate::types::AnalysisRequest;

/// Headline cards above the price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub current_price: String,
    pub change: String,
    pub market_cap: String,
    pub volume: String,
}

/// Latest readings of the oscillators, for the technical-analysis tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub rsi_zone: Option<&'static str>,
    pub atr_pct: Option<f64>,
    pub bollinger_width: Option<f64>,
}

/// Single-symbol tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    pub request: AnalysisRequest,
    pub overview: Overview,
    pub price_chart: ChartSpec,
    pub indicator_charts: Vec<ChartSpec>,
    pub snapshot: IndicatorSnapshot,
    pub statistics: Vec<MetricCard>,
    pub momentum: Vec<MetricCard>,
    pub summary: StatisticsSummary,
    pub company: CompanyInfo,
}

impl AnalysisView {
    pub fn build(
        request: AnalysisRequest,
        series: &OhlcvSeries,
        company: CompanyInfo,
        params: &IndicatorParams,
        chart_rows: usize,
    ) -> Self {
        let summary = StatisticsSummary::from_series(series, params);
        let outputs = IndicatorEngine::compute(series, &params.requests());
        let closes = series.closes();

        let rsi = current_rsi(&closes, params.rsi_window);
        let snapshot = IndicatorSnapshot {
            rsi: rsi.map(|(v, _)| v),
            rsi_zone: rsi.map(|(_, zone)| zone),
            atr_pct: current_atr_pct(series.bars(), params.atr_window),
            bollinger_width: current_bollinger(&closes, params.bollinger_window, params.bollinger_std)
                .and_then(|b| b.width),
        };

        let overview = Overview {
            current_price: summary
                .latest_price
                .map(|p| format!("${p:.2}"))
                .unwrap_or_else(|| format_number(None)),
            change: format_pct(summary.change_pct),
            market_cap: company.market_cap.clone(),
            volume: summary
                .latest_volume
                .map(format_volume)
                .unwrap_or_else(|| format_number(None)),
        };

        Self {
            price_chart: price_chart(&request.symbol, series),
            indicator_charts: indicator_charts(series, &outputs, chart_rows),
            statistics: summary.statistical_cards(),
            momentum: summary.momentum_cards(),
            request,
            overview,
            snapshot,
            summary,
            company,
        }
    }
}

/// Comparison tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub symbols: Vec<String>,
    pub performance_chart: ChartSpec,
    pub metrics: MetricsTable,
    pub volume_chart: ChartSpec,
    pub failures: Vec<SymbolFailure>,
}

impl ComparisonView {
    pub fn build(report: ComparisonReport, data: &HashMap<String, OhlcvSeries>) -> Self {
        let symbols: Vec<String> = report.metrics.symbols().into_iter().map(str::to_string).collect();
        Self {
            performance_chart: comparison_chart(&report.normalized),
            volume_chart: volume_comparison_chart(&symbols, data),
            symbols,
            metrics: report.metrics,
            failures: report.failures,
        }
    }
}

/// Whole-unit volume with thousands separators, e.g. `1,234,567`.
fn format_volume(volume: f64) -> String {
    let digits = format!("{:.0}", volume.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if volume < 0.0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::build_comparison;
    use crate::market_data::series::test_support::series_from_closes;
    use crate::statistics::INSUFFICIENT_DATA;
    use crate::types::{Interval, Period};

    fn request(symbol: &str) -> AnalysisRequest {
        AnalysisRequest {
            symbol: symbol.to_string(),
            period: Period::OneYear,
            interval: Interval::Daily,
        }
    }

    #[test]
    fn volume_formatting() {
        assert_eq!(format_volume(0.0), "0");
        assert_eq!(format_volume(999.0), "999");
        assert_eq!(format_volume(1_000.0), "1,000");
        assert_eq!(format_volume(1_234_567.0), "1,234,567");
    }

    #[test]
    fn analysis_view_for_normal_series() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let series = series_from_closes(&closes);
        let view = AnalysisView::build(
            request("AAPL"),
            &series,
            CompanyInfo::fallback("AAPL"),
            &IndicatorParams::default(),
            100,
        );
        assert!(view.overview.current_price.starts_with('$'));
        assert_eq!(view.overview.volume, "1,000");
        assert_eq!(view.overview.market_cap, "N/A");
        assert!(view.snapshot.rsi.is_some());
        assert!(view.snapshot.rsi_zone.is_some());
        assert!(view.snapshot.atr_pct.is_some());
        assert_eq!(view.statistics.len(), 4);
        assert_eq!(view.momentum.len(), 3);
        assert_eq!(view.price_chart.title, "AAPL Stock Price");
    }

    #[test]
    fn analysis_view_for_single_bar() {
        let series = series_from_closes(&[10.0]);
        let view = AnalysisView::build(
            request("ONE"),
            &series,
            CompanyInfo::fallback("ONE"),
            &IndicatorParams::default(),
            100,
        );
        assert_eq!(view.overview.current_price, "$10.00");
        assert_eq!(view.overview.change, INSUFFICIENT_DATA);
        assert!(view.snapshot.rsi.is_none());
        assert!(view.snapshot.bollinger_width.is_none());
    }

    #[test]
    fn comparison_view_uses_table_order() {
        let mut data = HashMap::new();
        data.insert("AAA".to_string(), series_from_closes(&[1.0, 2.0]));
        data.insert("BBB".to_string(), series_from_closes(&[3.0, 2.0]));
        let symbols = vec!["BBB".to_string(), "AAA".to_string()];
        let report = build_comparison(&data, &symbols, &IndicatorParams::default());

        let view = ComparisonView::build(report, &data);
        assert_eq!(view.symbols, symbols);
        assert_eq!(view.performance_chart.traces.len(), 2);
        assert_eq!(view.volume_chart.traces.len(), 2);
        assert!(view.failures.is_empty());
    }
}
