// =============================================================================
// Chart builders — turn series and indicator outputs into `ChartSpec`s
// =============================================================================
//
// Indicator charts show only the most recent `tail` rows so that long
// histories stay readable; the price chart always shows the full range.
// =============================================================================

use std::collections::HashMap;

use crate::comparison::NormalizedSeries;
use crate::indicators::{IndicatorOutput, IndicatorRequest};
use crate::market_data::OhlcvSeries;
use crate::presentation::chart::{tail, Axis, ChartSpec, Trace};

/// Candlestick price chart with a volume panel underneath.
pub fn price_chart(symbol: &str, series: &OhlcvSeries) -> ChartSpec {
    let x = series.timestamps();
    let mut chart = ChartSpec::new(format!("{symbol} Stock Price"), "Stock Price (USD)").with_secondary("Volume");
    chart.push(Trace::Candlestick {
        name: "OHLC".to_string(),
        x: x.clone(),
        open: series.opens(),
        high: series.highs(),
        low: series.lows(),
        close: series.closes(),
    });
    chart.push(Trace::Bar {
        name: "Volume".to_string(),
        x,
        y: series.volumes(),
        axis: Axis::Secondary,
    });
    chart
}

/// One chart per indicator family.
///
/// All SMA/EMA outputs share a "Moving Averages" chart drawn over the close;
/// Bollinger bands are drawn over the close as well.  Every other output gets
/// its own chart.
pub fn indicator_charts(series: &OhlcvSeries, outputs: &[IndicatorOutput], rows: usize) -> Vec<ChartSpec> {
    let x = tail(&series.timestamps(), rows);
    let close_line = || Trace::Line {
        name: "Close".to_string(),
        x: x.clone(),
        y: tail(&series.closes(), rows).into_iter().map(Some).collect(),
        axis: Axis::Primary,
    };
    let line = |name: &str, values: &[Option<f64>]| Trace::Line {
        name: name.to_string(),
        x: x.clone(),
        y: tail(values, rows),
        axis: Axis::Primary,
    };

    let mut charts = Vec::new();
    let mut averages: Option<ChartSpec> = None;

    for output in outputs {
        let (title, y_label) = match output.request {
            IndicatorRequest::Sma { .. } | IndicatorRequest::Ema { .. } => {
                let chart = averages.get_or_insert_with(|| {
                    let mut c = ChartSpec::new("Moving Averages", "Price (USD)");
                    c.push(close_line());
                    c
                });
                for l in &output.lines {
                    chart.push(line(&l.name, &l.values));
                }
                continue;
            }
            IndicatorRequest::Bollinger { .. } => {
                let mut chart = ChartSpec::new("Bollinger Bands", "Price (USD)");
                chart.push(close_line());
                for l in output.lines.iter().filter(|l| l.name != "Width") {
                    chart.push(line(&l.name, &l.values));
                }
                charts.push(chart);
                continue;
            }
            IndicatorRequest::PercentReturn => ("Returns", "Return"),
            IndicatorRequest::Momentum { .. } => ("Momentum", "Price Change (USD)"),
            IndicatorRequest::RateOfChange { .. } => ("Rate of Change", "Percent"),
            IndicatorRequest::Rsi { .. } => ("RSI", "RSI"),
            IndicatorRequest::Macd { .. } => ("MACD", "MACD"),
            IndicatorRequest::Stochastic { .. } => ("Stochastic Oscillator", "Percent"),
            IndicatorRequest::Atr { .. } => ("Average True Range", "Price (USD)"),
            IndicatorRequest::Obv => ("On-Balance Volume", "Volume"),
        };

        let mut chart = ChartSpec::new(title, y_label);
        for l in &output.lines {
            chart.push(line(&l.name, &l.values));
        }
        charts.push(chart);
    }

    if let Some(chart) = averages {
        charts.insert(0, chart);
    }
    charts
}

/// Normalised performance lines, one per symbol, in report order.
pub fn comparison_chart(normalized: &[NormalizedSeries]) -> ChartSpec {
    let mut chart = ChartSpec::new("Normalized Price Performance", "Change (%)");
    for n in normalized {
        chart.push(Trace::Line {
            name: n.symbol.clone(),
            x: n.timestamps.clone(),
            y: n.values.iter().copied().map(Some).collect(),
            axis: Axis::Primary,
        });
    }
    chart
}

/// Volume bars per symbol, in the given order; symbols without data are skipped.
pub fn volume_comparison_chart(symbols: &[String], data: &HashMap<String, OhlcvSeries>) -> ChartSpec {
    let mut chart = ChartSpec::new("Trading Volume Comparison", "Volume");
    for symbol in symbols {
        if let Some(series) = data.get(symbol) {
            chart.push(Trace::Bar {
                name: symbol.clone(),
                x: series.timestamps(),
                y: series.volumes(),
                axis: Axis::Primary,
            });
        }
    }
    chart
}
