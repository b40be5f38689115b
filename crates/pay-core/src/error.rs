//! Core Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors from the data model and record store
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input failed validation (never retried automatically)
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The backing store failed a read or write
    #[error("Store error: {0}")]
    Store(String),
}

impl CoreError {
    /// Validation errors map to 400, missing records to 404
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::Validation(_) | CoreError::NotFound(_))
    }
}
