// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All JSON endpoints live under `/api/v1/`; `/` serves the dashboard page,
// which renders the chart specifications returned here.
//
// Query parameters are taken as raw strings and validated by the handlers so
// that a bad period or interval produces the same JSON error body as every
// other failure.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::app_state::AppState;
use crate::comparison::compare_cohort;
use crate::config::DashboardConfig;
use crate::error::ApiError;
use crate::market_data::MarketDataSource;
use crate::presentation::{AnalysisView, ComparisonView};
use crate::types::{parse_symbols, AnalysisRequest, Interval, Period};

const INDEX_HTML: &str = include_str!("../../static/index.html");

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router<S: MarketDataSource + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/v1/health", get(health::<S>))
        .route("/api/v1/options", get(options::<S>))
        .route("/api/v1/analysis", get(analysis::<S>))
        .route("/api/v1/compare", get(compare::<S>))
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    requests_served: u64,
    server_time: i64,
}

async fn health<S: MarketDataSource>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        requests_served: state.served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Sidebar options
// =============================================================================

#[derive(Serialize)]
struct OptionsResponse {
    periods: Vec<Period>,
    intervals: Vec<Interval>,
    default_period: Period,
    default_interval: Interval,
    default_symbols: Vec<String>,
}

async fn options<S: MarketDataSource>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    let config = &state.config;
    Json(OptionsResponse {
        periods: Period::ALL.to_vec(),
        intervals: Interval::ALL.to_vec(),
        default_period: config.period,
        default_interval: config.interval,
        default_symbols: config.symbols.clone(),
    })
}

// =============================================================================
// Single-symbol analysis
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct AnalysisQuery {
    symbol: Option<String>,
    period: Option<String>,
    interval: Option<String>,
}

async fn analysis<S: MarketDataSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisView>, ApiError> {
    let config = &state.config;
    let (period, interval) = resolve_range(config, query.period.as_deref(), query.interval.as_deref())?;

    let symbol = match query.symbol.as_deref() {
        Some(raw) => parse_symbols(raw)
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::BadRequest("symbol must not be empty".to_string()))?,
        None => config
            .symbols
            .first()
            .cloned()
            .ok_or_else(|| ApiError::BadRequest("symbol is required".to_string()))?,
    };

    let (history, company) = tokio::join!(
        state.source.fetch_history(&symbol, period, interval),
        state.source.fetch_company_info(&symbol),
    );
    let series = history?;

    let request = AnalysisRequest {
        symbol,
        period,
        interval,
    };
    let view = AnalysisView::build(request, &series, company, &config.indicators, config.chart_rows);

    let total = state.record_served();
    info!(
        symbol = %view.request.symbol,
        period = %period,
        interval = %interval,
        bars = series.len(),
        total,
        "analysis served"
    );
    Ok(Json(view))
}

// =============================================================================
// Cohort comparison
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct CompareQuery {
    symbols: Option<String>,
    period: Option<String>,
    interval: Option<String>,
}

async fn compare<S: MarketDataSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ComparisonView>, ApiError> {
    let config = &state.config;
    let (period, interval) = resolve_range(config, query.period.as_deref(), query.interval.as_deref())?;

    let symbols = match query.symbols.as_deref() {
        Some(raw) => parse_symbols(raw),
        None => config.symbols.clone(),
    };
    if symbols.is_empty() {
        return Err(ApiError::BadRequest("at least one symbol is required".to_string()));
    }

    let (report, data) = compare_cohort(&state.source, &symbols, period, interval, &config.indicators).await;
    let view = ComparisonView::build(report, &data);

    let total = state.record_served();
    info!(symbols = ?symbols, failed = view.failures.len(), total, "comparison served");
    Ok(Json(view))
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse optional period/interval tokens, falling back to configured defaults.
fn resolve_range(
    config: &DashboardConfig,
    period: Option<&str>,
    interval: Option<&str>,
) -> Result<(Period, Interval), ApiError> {
    let period = match period {
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        None => config.period,
    };
    let interval = match interval {
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        None => config.interval,
    };
    Ok((period, interval))
}

// =============================================================================
// Tests
// =============================================================================
