//! Wallet Registry
//!
//! Per-merchant payout wallet management. New addresses are validated
//! against the ledger before acceptance, but a ledger outage fails open:
//! service unavailability must not brick merchant setup.

use std::sync::Arc;

use pay_core::{Merchant, MerchantUpdate, RecordStore};
use pay_horizon::LedgerClient;

use crate::error::{EngineError, Result};

/// Maps merchant identity to payout wallet address
pub struct WalletRegistry {
    store: Arc<dyn RecordStore>,
    ledger: Arc<dyn LedgerClient>,
}

impl WalletRegistry {
    pub fn new(store: Arc<dyn RecordStore>, ledger: Arc<dyn LedgerClient>) -> Self {
        Self { store, ledger }
    }

    /// Validate and persist a merchant's payout wallet.
    ///
    /// A definitive not-found from the ledger rejects the address with a
    /// corrective hint; an erroring existence check is treated as unknown
    /// and the write proceeds. The upsert never clobbers other merchant
    /// fields.
    pub async fn set_payout_wallet(
        &self,
        merchant_address: &str,
        payout_address: &str,
    ) -> Result<Merchant> {
        let merchant_address = merchant_address.trim();
        if merchant_address.is_empty() {
            return Err(EngineError::Validation("Merchant address is required".into()));
        }

        let payout_address = payout_address.trim();
        if payout_address.is_empty()
            || !payout_address.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(EngineError::Validation(
                "Valid payment wallet address is required".into(),
            ));
        }

        match self.ledger.account_exists(payout_address).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(EngineError::Validation(
                    "Wallet address not found on the Pi network. \
                     Double-check the address or fund the account first."
                        .into(),
                ));
            }
            Err(e) => {
                tracing::warn!(
                    payout_address = %payout_address,
                    error = %e,
                    "Ledger existence check unavailable; accepting wallet unverified"
                );
            }
        }

        let merchant = self
            .store
            .upsert_merchant(
                merchant_address,
                MerchantUpdate {
                    payment_wallet_address: Some(payout_address.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(
            merchant_address = %merchant_address,
            payout_address = %payout_address,
            "Payout wallet saved"
        );

        Ok(merchant)
    }

    /// The merchant's configured payout wallet, if any
    pub async fn payout_wallet(&self, merchant_address: &str) -> Result<Option<String>> {
        Ok(self
            .store
            .merchant(merchant_address)
            .await?
            .and_then(|m| m.payment_wallet_address))
    }
}
