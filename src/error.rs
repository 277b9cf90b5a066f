use std::path::PathBuf;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset load failures (fatal at startup)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("expected a top-level JSON array of records")]
    NotRecordArray,

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    /// `row` counts data records from 1; a CSV header line is not counted.
    #[error("record {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: &'static str },

    #[error("record {row}: invalid value {value:?} in column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("dataset contains no launch records")]
    Empty,
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidOverride { key: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// HTTP boundary errors
// ---------------------------------------------------------------------------

/// Errors returned to the browser. Empty filter results are never errors;
/// only selections the controls could not have produced end up here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload range: [{lo}, {hi}]")]
    InvalidRange { lo: f64, hi: f64 },

    /// Body was not JSON, had the wrong content type, or did not fit
    /// `SelectionRequest`.
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("rejecting request: {self}");
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
