//! Ledger Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, HorizonError>;

/// Errors from the ledger query service.
///
/// Remote 404s normalize to `NotFound`; every other remote failure
/// normalizes to `Fetch` carrying the upstream message.
#[derive(Error, Debug)]
pub enum HorizonError {
    /// The queried record does not exist on the ledger
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The ledger service answered with a non-success status
    #[error("Failed to fetch {what}: {detail}")]
    Fetch { what: &'static str, detail: String },

    /// Transport-level failure (includes timeouts)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HorizonError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HorizonError::NotFound(_))
    }
}
