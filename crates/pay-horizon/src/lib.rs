//! # pay-horizon
//!
//! Read-only access to the Pi blockchain's public ledger API (Horizon):
//! account and transaction lookups, cursor-paginated listings, and the
//! payment verifier that decides whether an on-chain transaction actually
//! paid an expected recipient an expected amount.
//!
//! Nothing here mutates state. The verifier is a pure query+decision
//! function: safely retryable, cacheable by transaction hash, and it never
//! returns an error; every failure folds into `verified: false` with a
//! diagnostic message.

pub mod client;
pub mod error;
pub mod mock;
pub mod types;
pub mod verify;

pub use client::{HorizonClient, HorizonConfig, LedgerClient};
pub use error::{HorizonError, Result};
pub use mock::MockLedgerClient;
pub use types::{Operation, PageQuery, TransactionRecord};
pub use verify::{PaymentVerifier, VerificationResult};
