//! Platform Gateway Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Errors from the payment processor
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Missing or invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The processor answered with a non-success status; `detail` carries
    /// the raw upstream body for diagnostics
    #[error("Pi Platform API error ({status})")]
    Api { status: u16, detail: serde_json::Value },

    /// Transport-level failure (includes timeouts); no local state was
    /// mutated, safe to retry
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl PlatformError {
    /// Upstream HTTP status to propagate, when one exists
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            PlatformError::Api { status, .. } => Some(*status),
            PlatformError::Network(e) => e.status().map(|s| s.as_u16()),
            PlatformError::Config(_) => None,
        }
    }

    /// Raw upstream detail for error bodies
    pub fn upstream_detail(&self) -> Option<&serde_json::Value> {
        match self {
            PlatformError::Api { detail, .. } => Some(detail),
            _ => None,
        }
    }
}
