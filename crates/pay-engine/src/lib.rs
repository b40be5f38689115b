//! # pay-engine
//!
//! The reconciliation core: takes a client-initiated payment through
//! server-side approval, on-chain verification, and server-side completion
//! while keeping local stock counters and payment status consistent under
//! partial failure.
//!
//! The orchestrator holds no cross-request state. Every step reads a
//! snapshot from the record store, computes a decision, and issues single
//! conditional writes, which is what makes its idempotency story sound.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod wallet;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use orchestrator::{CompletionOutcome, CreatePaymentRequest, PaymentOrchestrator};
pub use wallet::WalletRegistry;
