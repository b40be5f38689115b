//! Engine Error Types
//!
//! The taxonomy the HTTP layer maps onto status codes: validation (400),
//! not-found (404), upstream (propagated processor status, else 500),
//! configuration and storage (500). A chain-verification mismatch is a
//! structured result value, never one of these errors.

use thiserror::Error;

use pay_core::CoreError;
use pay_platform::PlatformError;

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the orchestrator and wallet registry
#[derive(Error, Debug)]
pub enum EngineError {
    /// Missing or malformed input; never retried automatically
    #[error("{0}")]
    Validation(String),

    /// A referenced link, payment, or merchant record is missing
    #[error("{0}")]
    NotFound(String),

    /// A processor or ledger call failed; carries the upstream status and
    /// raw detail for the error body
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        detail: Option<serde_json::Value>,
    },

    /// The engine is missing required configuration
    #[error("{0}")]
    Config(String),

    /// The record store failed a read or write on the primary path
    #[error("Store error: {0}")]
    Store(String),
}

impl EngineError {
    /// Wrap a processor failure, preserving its HTTP status when present
    pub fn upstream(message: impl Into<String>, source: PlatformError) -> Self {
        match source {
            PlatformError::Config(msg) => EngineError::Config(msg),
            other => {
                let detail = other
                    .upstream_detail()
                    .cloned()
                    .unwrap_or_else(|| serde_json::Value::String(other.to_string()));
                EngineError::Upstream {
                    message: message.into(),
                    status: other.upstream_status(),
                    detail: Some(detail),
                }
            }
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => EngineError::Validation(msg),
            CoreError::NotFound(what) => EngineError::NotFound(format!("{what} not found")),
            CoreError::Store(msg) => EngineError::Store(msg),
        }
    }
}
