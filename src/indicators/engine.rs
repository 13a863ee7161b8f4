// =============================================================================
// Indicator Engine — computes a requested set of indicators over one series
// =============================================================================
//
// Callers describe what they want with `IndicatorRequest` values; the engine
// returns one `IndicatorOutput` per request, in request order, each holding
// one or more named lines aligned with the source bars.  Nothing here fails:
// short input produces all-`None` lines.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::atr::calculate_atr;
use super::bollinger::calculate_bollinger;
use super::ema::calculate_ema;
use super::macd::calculate_macd;
use super::momentum::{calculate_momentum, calculate_roc, RocWarmup};
use super::obv::calculate_obv;
use super::returns::percent_return_series;
use super::rsi::calculate_rsi;
use super::sma::calculate_sma;
use super::stochastic::calculate_stochastic;
use super::IndicatorSeries;
use crate::market_data::OhlcvSeries;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_sma_windows() -> Vec<usize> {
    vec![20, 50]
}

fn default_rsi_window() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bollinger_window() -> usize {
    20
}

fn default_bollinger_std() -> f64 {
    2.0
}

fn default_stochastic_window() -> usize {
    14
}

fn default_stochastic_smooth() -> usize {
    3
}

fn default_atr_window() -> usize {
    14
}

fn default_momentum_period() -> usize {
    20
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Window parameters for the indicators the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Moving-average windows drawn over the close.
    #[serde(default = "default_sma_windows")]
    pub sma_windows: Vec<usize>,

    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bollinger_window")]
    pub bollinger_window: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_std")]
    pub bollinger_std: f64,

    #[serde(default = "default_stochastic_window")]
    pub stochastic_window: usize,

    /// %D smoothing window.
    #[serde(default = "default_stochastic_smooth")]
    pub stochastic_smooth: usize,

    #[serde(default = "default_atr_window")]
    pub atr_window: usize,

    /// Look-back for momentum and rate of change.
    #[serde(default = "default_momentum_period")]
    pub momentum_period: usize,

    /// Fill policy for rate-of-change warm-up rows.
    #[serde(default)]
    pub roc_warmup: RocWarmup,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_windows: default_sma_windows(),
            rsi_window: default_rsi_window(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_window: default_bollinger_window(),
            bollinger_std: default_bollinger_std(),
            stochastic_window: default_stochastic_window(),
            stochastic_smooth: default_stochastic_smooth(),
            atr_window: default_atr_window(),
            momentum_period: default_momentum_period(),
            roc_warmup: RocWarmup::default(),
        }
    }
}

impl IndicatorParams {
    /// The full chart set: every SMA window plus one request per indicator.
    pub fn requests(&self) -> Vec<IndicatorRequest> {
        let mut out: Vec<IndicatorRequest> = self
            .sma_windows
            .iter()
            .map(|&window| IndicatorRequest::Sma { window })
            .collect();
        out.extend([
            IndicatorRequest::Rsi {
                window: self.rsi_window,
            },
            IndicatorRequest::Macd {
                fast: self.macd_fast,
                slow: self.macd_slow,
                signal: self.macd_signal,
            },
            IndicatorRequest::Bollinger {
                window: self.bollinger_window,
                num_std: self.bollinger_std,
            },
            IndicatorRequest::Stochastic {
                window: self.stochastic_window,
                smooth: self.stochastic_smooth,
            },
            IndicatorRequest::Atr {
                window: self.atr_window,
            },
            IndicatorRequest::Obv,
        ]);
        out
    }
}

// =============================================================================
// Requests and outputs
// =============================================================================

/// One indicator with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorRequest {
    Sma { window: usize },
    Ema { window: usize },
    PercentReturn,
    Momentum { period: usize },
    RateOfChange { period: usize, warmup: RocWarmup },
    Rsi { window: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Bollinger { window: usize, num_std: f64 },
    Stochastic { window: usize, smooth: usize },
    Atr { window: usize },
    Obv,
}

/// A labelled indicator line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: IndicatorSeries,
}

impl NamedSeries {
    fn new(name: impl Into<String>, values: IndicatorSeries) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// All lines produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorOutput {
    pub request: IndicatorRequest,
    pub lines: Vec<NamedSeries>,
}

impl IndicatorOutput {
    /// Line by name, if present.
    #[cfg(test)]
    pub fn line(&self, name: &str) -> Option<&NamedSeries> {
        self.lines.iter().find(|l| l.name == name)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Stateless dispatcher from requests to indicator functions.
pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute every request against `series`, preserving request order.
    pub fn compute(series: &OhlcvSeries, requests: &[IndicatorRequest]) -> Vec<IndicatorOutput> {
        let closes = series.closes();
        requests
            .iter()
            .map(|request| IndicatorOutput {
                request: request.clone(),
                lines: Self::compute_one(series, &closes, request),
            })
            .collect()
    }

    fn compute_one(series: &OhlcvSeries, closes: &[f64], request: &IndicatorRequest) -> Vec<NamedSeries> {
        use IndicatorRequest as R;

        match *request {
            R::Sma { window } => vec![NamedSeries::new(format!("SMA{window}"), calculate_sma(closes, window))],
            R::Ema { window } => vec![NamedSeries::new(format!("EMA{window}"), calculate_ema(closes, window))],
            R::PercentReturn => vec![NamedSeries::new("Return", percent_return_series(closes))],
            R::Momentum { period } => vec![NamedSeries::new(
                format!("Momentum{period}"),
                calculate_momentum(closes, period),
            )],
            R::RateOfChange { period, warmup } => vec![NamedSeries::new(
                format!("ROC{period}"),
                calculate_roc(closes, period, warmup),
            )],
            R::Rsi { window } => vec![NamedSeries::new("RSI", calculate_rsi(closes, window))],
            R::Macd { fast, slow, signal } => {
                let macd = calculate_macd(closes, fast, slow, signal);
                vec![
                    NamedSeries::new("MACD", macd.line),
                    NamedSeries::new("Signal", macd.signal),
                    NamedSeries::new("Histogram", macd.histogram),
                ]
            }
            R::Bollinger { window, num_std } => {
                let bands = calculate_bollinger(closes, window, num_std);
                vec![
                    NamedSeries::new("Upper", bands.upper),
                    NamedSeries::new("Middle", bands.middle),
                    NamedSeries::new("Lower", bands.lower),
                    NamedSeries::new("Width", bands.width),
                ]
            }
            R::Stochastic { window, smooth } => {
                let st = calculate_stochastic(series.bars(), window, smooth);
                vec![NamedSeries::new("%K", st.k), NamedSeries::new("%D", st.d)]
            }
            R::Atr { window } => vec![NamedSeries::new("ATR", calculate_atr(series.bars(), window))],
            R::Obv => vec![NamedSeries::new("OBV", calculate_obv(series.bars()))],
        }
    }
}
