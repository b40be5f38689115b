//! Application State

use std::sync::Arc;

use pay_core::RecordStore;
use pay_engine::{PaymentOrchestrator, WalletRegistry};
use pay_horizon::{LedgerClient, PaymentVerifier};
use pay_platform::PiPlatformClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record store for links, payments, merchants, products
    pub store: Arc<dyn RecordStore>,

    /// Read-only ledger access
    pub ledger: Arc<dyn LedgerClient>,

    /// On-chain payment verifier
    pub verifier: PaymentVerifier,

    /// Pi Platform client (None when PI_API_KEY is not configured)
    pub platform: Option<Arc<PiPlatformClient>>,

    /// Payment reconciliation state machine
    pub orchestrator: Arc<PaymentOrchestrator>,

    /// Merchant payout wallet registry
    pub wallets: Arc<WalletRegistry>,
}
