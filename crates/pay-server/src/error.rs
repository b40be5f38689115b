//! API Error Responses
//!
//! Every error leaves the server as `{ "error": ..., "details"?: ... }`.
//! Upstream processor failures carry the processor's HTTP status and raw
//! body; nothing here ever exposes a stack trace.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use pay_core::CoreError;
use pay_engine::EngineError;
use pay_horizon::HorizonError;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// An error response with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.body.error)
    }
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => Self::bad_request(msg),
            EngineError::NotFound(msg) => Self::not_found(msg),
            EngineError::Upstream {
                message,
                status,
                detail,
            } => Self {
                status: status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body: ErrorBody {
                    error: message,
                    details: detail,
                },
            },
            EngineError::Config(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
            EngineError::Store(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl From<HorizonError> for ApiError {
    fn from(err: HorizonError) -> Self {
        match err {
            HorizonError::NotFound(_) => Self::not_found(err.to_string()),
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::bad_request(msg),
            CoreError::NotFound(_) => Self::not_found(err.to_string()),
            CoreError::Store(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}
