// =============================================================================
// Comparison Aggregator — normalised performance and cross-symbol metrics
// =============================================================================
//
// Each symbol is normalised against its own first close:
//   normalized_t = (close_t / close_0 - 1) * 100
// No calendar alignment is attempted.  Symbols whose histories start on
// different dates are compared from their own first observation.
//
// Output order always follows the caller's symbol list, never the order in
// which fetches complete.
// =============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::DataError;
use crate::indicators::IndicatorParams;
use crate::market_data::{MarketDataSource, OhlcvSeries};
use crate::statistics::StatisticsSummary;
use crate::types::{Interval, Period};

/// Percent performance of one symbol relative to its first close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub symbol: String,
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub symbol: String,
    pub summary: StatisticsSummary,
}

/// Summary metrics per symbol, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsTable {
    pub rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn symbols(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[cfg(test)]
    pub fn get(&self, symbol: &str) -> Option<&StatisticsSummary> {
        self.rows.iter().find(|r| r.symbol == symbol).map(|r| &r.summary)
    }
}

/// A symbol that could not take part in the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub message: String,
}

impl SymbolFailure {
    fn from_error(symbol: &str, err: &DataError) -> Self {
        Self {
            symbol: symbol.to_string(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub normalized: Vec<NormalizedSeries>,
    pub metrics: MetricsTable,
    pub failures: Vec<SymbolFailure>,
}

/// Normalise closes to percent change from the first close.
///
/// A zero (or missing) baseline yields all zeros.
pub fn normalize_closes(closes: &[f64]) -> Vec<f64> {
    match closes.first() {
        Some(&base) if base != 0.0 => closes.iter().map(|c| (c / base - 1.0) * 100.0).collect(),
        _ => vec![0.0; closes.len()],
    }
}

/// Build normalised series and the metrics table for `symbols`.
///
/// Repeated symbols are used once, at their first position.  Symbols with no
/// entry in `data` are listed in `failures`.
pub fn build_comparison(
    data: &HashMap<String, OhlcvSeries>,
    symbols: &[String],
    params: &IndicatorParams,
) -> ComparisonReport {
    let mut report = ComparisonReport::default();
    let mut seen: Vec<&str> = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        if seen.contains(&symbol.as_str()) {
            continue;
        }
        seen.push(symbol);

        let Some(series) = data.get(symbol) else {
            report
                .failures
                .push(SymbolFailure::from_error(symbol, &DataError::Empty(symbol.clone())));
            continue;
        };

        report.normalized.push(NormalizedSeries {
            symbol: symbol.clone(),
            timestamps: series.timestamps(),
            values: normalize_closes(&series.closes()),
        });
        report.metrics.rows.push(MetricsRow {
            symbol: symbol.clone(),
            summary: StatisticsSummary::from_series(series, params),
        });
    }

    report
}

/// Fetch every symbol concurrently; results come back in input order.
pub async fn fetch_cohort<S: MarketDataSource>(
    source: &S,
    symbols: &[String],
    period: Period,
    interval: Interval,
) -> Vec<(String, Result<OhlcvSeries, DataError>)> {
    let fetches = symbols
        .iter()
        .map(|symbol| source.fetch_history(symbol, period, interval));
    let results = join_all(fetches).await;
    symbols.iter().cloned().zip(results).collect()
}

/// Fetch and compare a cohort.  A failed symbol is reported, never fatal.
///
/// Returns the report together with the fetched series (for volume charts).
pub async fn compare_cohort<S: MarketDataSource>(
    source: &S,
    symbols: &[String],
    period: Period,
    interval: Interval,
    params: &IndicatorParams,
) -> (ComparisonReport, HashMap<String, OhlcvSeries>) {
    let mut data = HashMap::with_capacity(symbols.len());
    let mut fetched: Vec<String> = Vec::with_capacity(symbols.len());
    let mut failures = Vec::new();

    for (symbol, result) in fetch_cohort(source, symbols, period, interval).await {
        match result {
            Ok(series) => {
                fetched.push(symbol.clone());
                data.insert(symbol, series);
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "comparison fetch failed");
                failures.push(SymbolFailure::from_error(&symbol, &e));
            }
        }
    }

    let mut report = build_comparison(&data, &fetched, params);
    failures.append(&mut report.failures);
    report.failures = failures;

    info!(
        requested = symbols.len(),
        compared = report.metrics.rows.len(),
        failed = report.failures.len(),
        "comparison built"
    );
    (report, data)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::market_data::series::test_support::series_from_closes;
    use crate::market_data::CompanyInfo;

    /// In-memory source.  Earlier symbols answer more slowly so completion
    /// order is the reverse of request order.
    pub struct StubSource {
        pub data: HashMap<String, Vec<f64>>,
        pub calls: AtomicUsize,
    }

    impl StubSource {
        pub fn new(entries: &[(&str, &[f64])]) -> Self {
            Self {
                data: entries
                    .iter()
                    .map(|(s, c)| (s.to_string(), c.to_vec()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl MarketDataSource for StubSource {
        async fn fetch_history(
            &self,
            symbol: &str,
            _period: Period,
            _interval: Interval,
        ) -> Result<OhlcvSeries, DataError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30u64.saturating_sub(n as u64 * 10))).await;
            match self.data.get(symbol) {
                Some(closes) if closes.is_empty() => Err(DataError::Empty(symbol.to_string())),
                Some(closes) => Ok(series_from_closes(closes)),
                None => Err(DataError::NotFound(symbol.to_string())),
            }
        }

        async fn fetch_company_info(&self, symbol: &str) -> CompanyInfo {
            CompanyInfo::fallback(symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::StubSource;
    use super::*;
    use crate::market_data::series::test_support::series_from_closes;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_against_first_close() {
        let n = normalize_closes(&[50.0, 55.0, 45.0]);
        assert_eq!(n[0], 0.0);
        assert!((n[1] - 10.0).abs() < 1e-9);
        assert!((n[2] + 10.0).abs() < 1e-9);
    }

    #[test]
    fn renormalizing_starts_at_zero() {
        let once = normalize_closes(&[80.0, 100.0, 120.0]);
        let twice = normalize_closes(&once);
        assert_eq!(twice[0], 0.0);
    }

    #[test]
    fn normalize_degenerate_inputs() {
        assert!(normalize_closes(&[]).is_empty());
        assert_eq!(normalize_closes(&[0.0, 3.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn table_preserves_input_order() {
        let mut data = HashMap::new();
        data.insert("BBB".to_string(), series_from_closes(&[10.0, 11.0]));
        data.insert("AAA".to_string(), series_from_closes(&[20.0, 19.0, 21.0]));

        let report = build_comparison(&data, &symbols(&["AAA", "BBB"]), &IndicatorParams::default());
        assert_eq!(report.metrics.symbols(), vec!["AAA", "BBB"]);
        assert_eq!(report.normalized[0].symbol, "AAA");
        assert_eq!(report.normalized[0].values.len(), 3);
        assert_eq!(report.metrics.get("BBB").unwrap().latest_price, Some(11.0));
        assert!(report.failures.is_empty());
    }

    #[test]
    fn missing_and_repeated_symbols() {
        let mut data = HashMap::new();
        data.insert("AAA".to_string(), series_from_closes(&[1.0, 2.0]));

        let report = build_comparison(&data, &symbols(&["AAA", "ZZZ", "AAA"]), &IndicatorParams::default());
        assert_eq!(report.metrics.symbols(), vec!["AAA"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].symbol, "ZZZ");
    }

    #[tokio::test]
    async fn cohort_order_ignores_completion_order() {
        let source = StubSource::new(&[("AAA", &[1.0, 2.0, 3.0]), ("BBB", &[5.0, 4.0])]);
        let results = fetch_cohort(&source, &symbols(&["AAA", "BBB"]), Period::OneYear, Interval::Daily).await;
        let order: Vec<&str> = results.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["AAA", "BBB"]);

        let (report, data) = compare_cohort(
            &source,
            &symbols(&["AAA", "BBB"]),
            Period::OneYear,
            Interval::Daily,
            &IndicatorParams::default(),
        )
        .await;
        assert_eq!(report.metrics.symbols(), vec!["AAA", "BBB"]);
        assert_eq!(data.len(), 2);
    }

    #[tokio::test]
    async fn cohort_reports_failures_without_aborting() {
        let source = StubSource::new(&[("AAA", &[1.0, 2.0]), ("EMPTY", &[])]);
        let (report, _) = compare_cohort(
            &source,
            &symbols(&["NOPE", "AAA", "EMPTY"]),
            Period::OneMonth,
            Interval::Daily,
            &IndicatorParams::default(),
        )
        .await;
        assert_eq!(report.metrics.symbols(), vec!["AAA"]);
        let failed: Vec<&str> = report.failures.iter().map(|f| f.symbol.as_str()).collect();
        assert_eq!(failed, vec!["NOPE", "EMPTY"]);
        assert!(report.failures[0].message.contains("'NOPE'"));
    }
}
