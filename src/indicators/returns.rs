// =============================================================================
// Returns, Volatility, Sharpe Ratio and Drawdown
// =============================================================================
//
//   return_t     = close_t / close_{t-1} - 1
//   volatility   = sample_stddev(returns) * sqrt(252)
//   sharpe       = mean(returns) * 252 / volatility
//   drawdown_t   = (running_peak_t - close_t) / running_peak_t
//
// Ratio-type outputs degrade to 0 instead of NaN: fewer than two returns
// gives zero volatility and zero volatility gives a zero Sharpe ratio.
// =============================================================================

use super::IndicatorSeries;

/// Trading sessions per year used for annualisation.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Period-over-period returns as plain observations (length `n - 1`).
///
/// A zero previous close contributes a 0.0 return.
pub fn percent_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { w[1] / w[0] - 1.0 })
        .collect()
}

/// Returns aligned with the closes: `None` at t = 0.
pub fn percent_return_series(closes: &[f64]) -> IndicatorSeries {
    if closes.is_empty() {
        return Vec::new();
    }
    std::iter::once(None)
        .chain(percent_returns(closes).into_iter().map(Some))
        .collect()
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Annualised volatility of a return series; 0 with fewer than two returns.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    match sample_std_dev(returns) {
        Some(sd) if sd.is_finite() => sd * TRADING_DAYS_PER_YEAR.sqrt(),
        _ => 0.0,
    }
}

/// Annualised Sharpe ratio (zero risk-free rate); exactly 0 when volatility is 0.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let volatility = annualized_volatility(returns);
    if volatility == 0.0 {
        return 0.0;
    }
    let annual_return = mean(returns).unwrap_or(0.0) * TRADING_DAYS_PER_YEAR;
    let sharpe = annual_return / volatility;
    if sharpe.is_finite() {
        sharpe
    } else {
        0.0
    }
}

/// Largest fractional decline from a running peak, in `[0, 1]`.
///
/// Returns 0 for an empty series or one that never falls below its peak.
/// Non-positive peaks are skipped because the ratio is meaningless there.
pub fn max_drawdown(closes: &[f64]) -> f64 {
    let Some(&first) = closes.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd: f64 = 0.0;
    for &close in closes {
        if close > peak {
            peak = close;
        } else if peak > 0.0 {
            let dd = (peak - close) / peak;
            if dd.is_finite() {
                max_dd = max_dd.max(dd);
            }
        }
    }
    max_dd.clamp(0.0, 1.0)
}
