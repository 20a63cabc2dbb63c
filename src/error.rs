//! Error codes and the JSON error body shared by every route.
//!
//! DESIGN
//! ======
//! Module errors stay plain `thiserror` enums. Each one implements
//! `ErrorCode` so handlers can turn it into a grepable `E_*` code and a
//! retryable hint without knowing the variants. Status mapping lives in the
//! route module that owns the endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub retryable: bool,
}

/// An error ready to leave a handler: status plus body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// Build from any coded error.
    pub fn from_err(status: StatusCode, err: &impl ErrorCode) -> Self {
        Self {
            status,
            body: ErrorBody { error: err.to_string(), code: err.error_code().to_owned(), retryable: err.retryable() },
        }
    }

    /// Build from a bare code and message (for route-level failures with no enum).
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self { status, body: ErrorBody { error: message.into(), code: code.to_owned(), retryable: false } }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
