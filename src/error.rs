//! Application-wide error types.
//!
//! [`AppError`] covers process-level failures surfaced from `run()`.
//! [`ApiError`] is the per-request error returned by HTTP handlers; it owns
//! the mapping to status codes and the JSON error body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::classifier::ClassifyError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Message returned for a missing or empty `data` array.
pub const DATA_REQUIRED: &str = "Data array is required";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side input problem. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Anything unexpected while processing the request. HTTP 500.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn data_required() -> Self {
        Self::Validation(DATA_REQUIRED.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClassifyError> for ApiError {
    fn from(e: ClassifyError) -> Self {
        match e {
            ClassifyError::EmptyInput => Self::data_required(),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// JSON body for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub is_success: bool,
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { is_success: false, detail: detail.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
