// =============================================================================
// Error taxonomy
// =============================================================================
//
// Only retrieval failures are errors.  Short series and degenerate arithmetic
// are recovered inside the indicator and statistics modules and never reach
// this file.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Violations detected while assembling an OHLCV series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} timestamp {timestamp} is earlier than its predecessor")]
    OutOfOrder { index: usize, timestamp: i64 },

    #[error("bar {index} repeats timestamp {timestamp}")]
    DuplicateTimestamp { index: usize, timestamp: i64 },
}

/// Data for a symbol could not be obtained.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("symbol '{0}' was not found")]
    NotFound(String),

    #[error("no price data returned for '{0}'")]
    Empty(String),

    #[error("malformed data for '{symbol}': {reason}")]
    Malformed { symbol: String, reason: String },

    #[error("data provider request failed: {0}")]
    Transport(String),
}

impl DataError {
    /// One-line message shown to the user for a failed symbol.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(sym) | Self::Empty(sym) | Self::Malformed { symbol: sym, .. } => format!(
                "Unable to fetch data for symbol '{sym}'. Please check if the symbol is correct."
            ),
            Self::Transport(_) => "The market data provider is unavailable. Please try again later.".to_string(),
        }
    }
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            Self::Data(err) => {
                let status = match err {
                    DataError::NotFound(_) | DataError::Empty(_) => StatusCode::NOT_FOUND,
                    DataError::Malformed { .. } | DataError::Transport(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.user_message(), Some(err.to_string()))
            }
        };

        let body = json!({ "error": message, "detail": detail });
        (status, axum::Json(body)).into_response()
    }
}
