//! # HTTP Errors
//!
//! Client-facing errors and their status codes. Every error body is the
//! envelope `{"success": false, "error": "<message>"}`.

use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned to HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Path id is not an integer
    #[error("invalid id")]
    InvalidId,

    /// Body is not valid JSON for the expected shape
    #[error("invalid request body")]
    InvalidBody,

    /// Body decoded but failed field validation
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Record does not exist
    #[error("record not found")]
    NotFound,

    /// Path matched but the method is not served there
    #[error("method not allowed")]
    MethodNotAllowed,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Anything else. The message is generic; detail goes to the log only.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

/// Errors that stop the server itself
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("server task failed: {0}")]
    Task(String),
}
