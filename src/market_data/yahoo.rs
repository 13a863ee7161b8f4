// =============================================================================
// Yahoo Finance REST client — historical bars and company profile
// =============================================================================
//
// Two public endpoints are used:
//   GET /v8/finance/chart/{symbol}?range=..&interval=..     (OHLCV history)
//   GET /v10/finance/quoteSummary/{symbol}?modules=..       (company profile)
//
// Neither requires authentication.  Rows with a null in any OHLCV field are
// skipped; a symbol with zero usable rows is reported as `DataError::Empty`.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::DataError;
use crate::market_data::source::{format_market_cap, CompanyInfo, MarketDataSource};
use crate::market_data::{Bar, OhlcvSeries, SeriesBuilder};
use crate::types::{Interval, Period};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const PROFILE_MODULES: &str = "price,assetProfile";

/// HTTP client for the Yahoo Finance chart and quote-summary endpoints.
#[derive(Clone)]
pub struct YahooClient {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        // The chart endpoint rejects requests without a browser-like agent.
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (compatible; equity-dashboard/1.0)"),
        );

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client")?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .with_context(|| format!("invalid market data URL '{raw}'"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("market data URL '{raw}' cannot carry a path");
        }
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// `base/segments..?query`, with every segment percent-encoded so a
    /// symbol can never add path components or query parameters.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().extend_pairs(query);
        url
    }

    fn chart_url(&self, symbol: &str, period: Period, interval: Interval) -> Url {
        self.endpoint(
            &["v8", "finance", "chart", symbol],
            &[("range", period.as_str()), ("interval", interval.as_str())],
        )
    }

    fn profile_url(&self, symbol: &str) -> Url {
        self.endpoint(
            &["v10", "finance", "quoteSummary", symbol],
            &[("modules", PROFILE_MODULES)],
        )
    }

    async fn get_text(&self, url: Url, symbol: &str) -> Result<(StatusCode, String), DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::Transport(format!("failed to read response for {symbol}: {e}")))?;
        Ok((status, body))
    }
}

impl MarketDataSource for YahooClient {
    #[instrument(skip(self), name = "yahoo::fetch_history")]
    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<OhlcvSeries, DataError> {
        let url = self.chart_url(symbol, period, interval);
        let (status, body) = self.get_text(url, symbol).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(DataError::Transport(format!(
                "GET chart/{symbol} returned {status}"
            )));
        }

        let series = parse_chart_response(symbol, &body)?;
        debug!(symbol, %period, %interval, bars = series.len(), "history fetched");
        Ok(series)
    }

    #[instrument(skip(self), name = "yahoo::fetch_company_info")]
    async fn fetch_company_info(&self, symbol: &str) -> CompanyInfo {
        let url = self.profile_url(symbol);
        match self.get_text(url, symbol).await {
            Ok((status, body)) if status.is_success() => parse_profile_response(symbol, &body),
            Ok((status, _)) => {
                warn!(symbol, %status, "company profile unavailable, using fallback");
                CompanyInfo::fallback(symbol)
            }
            Err(e) => {
                warn!(symbol, error = %e, "company profile request failed, using fallback");
                CompanyInfo::fallback(symbol)
            }
        }
    }
}

// =============================================================================
// Response parsing
// =============================================================================

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ProviderError>,
}

#[derive(Deserialize)]
struct ProviderError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteArrays>,
}

#[derive(Deserialize, Default)]
struct QuoteArrays {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a `/v8/finance/chart` body into an [`OhlcvSeries`].
///
/// Expected shape:
/// ```json
/// { "chart": { "result": [ { "timestamp": [..],
///     "indicators": { "quote": [ { "open": [..], "high": [..], "low": [..],
///                                  "close": [..], "volume": [..] } ] } } ],
///   "error": null } }
/// ```
fn parse_chart_response(symbol: &str, body: &str) -> Result<OhlcvSeries, DataError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| DataError::Malformed {
        symbol: symbol.to_string(),
        reason: e.to_string(),
    })?;

    if let Some(err) = envelope.chart.error {
        let code = err.code.unwrap_or_default();
        debug!(symbol, code = %code, description = ?err.description, "provider reported error");
        return Err(DataError::NotFound(symbol.to_string()));
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or_else(|| DataError::NotFound(symbol.to_string()))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut builder = SeriesBuilder::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
        let row = (
            Utc.timestamp_opt(ts, 0).single(),
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
        );
        match row {
            (Some(timestamp), Some(open), Some(high), Some(low), Some(close)) => {
                builder.push(Bar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume: field(&quote.volume).unwrap_or(0.0),
                });
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 || builder.dropped() > 0 {
        warn!(symbol, skipped, out_of_order = builder.dropped(), "discarded unusable rows");
    }

    let series = builder.build().map_err(|e| DataError::Malformed {
        symbol: symbol.to_string(),
        reason: e.to_string(),
    })?;
    if series.is_empty() {
        return Err(DataError::Empty(symbol.to_string()));
    }
    Ok(series)
}

#[derive(Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Deserialize)]
struct SummaryBody {
    result: Option<Vec<SummaryResult>>,
}

#[derive(Deserialize)]
struct SummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "assetProfile")]
    asset_profile: Option<ProfileModule>,
}

#[derive(Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Deserialize)]
struct ProfileModule {
    #[serde(rename = "longBusinessSummary")]
    long_business_summary: Option<String>,
}

/// Parse a `/v10/finance/quoteSummary` body, substituting fallback values for
/// every missing field.
fn parse_profile_response(symbol: &str, body: &str) -> CompanyInfo {
    let fallback = CompanyInfo::fallback(symbol);

    let result = match serde_json::from_str::<SummaryEnvelope>(body) {
        Ok(env) => env.quote_summary.result.and_then(|r| r.into_iter().next()),
        Err(e) => {
            warn!(symbol, error = %e, "failed to parse company profile");
            None
        }
    };
    let Some(result) = result else {
        return fallback;
    };

    let (name, market_cap) = match result.price {
        Some(price) => (price.long_name, price.market_cap.and_then(|m| m.raw)),
        None => (None, None),
    };
    let description = result.asset_profile.and_then(|p| p.long_business_summary);

    CompanyInfo {
        name: name.unwrap_or(fallback.name),
        description: description.unwrap_or(fallback.description),
        market_cap: format_market_cap(market_cap),
    }
}
