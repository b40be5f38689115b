//! Reconciliation Orchestrator
//!
//! Coordinates payment creation, server-side approval, on-chain
//! verification, and server-side completion. Per-payment states move
//! `CREATED -> APPROVED -> (chain-checked) -> COMPLETED`; the processor's
//! completion confirmation is what releases goods.
//!
//! Failure containment: ledger trouble never prevents asking the processor
//! to complete (unless strict mode is on); processor trouble aborts the
//! request and surfaces with the upstream status. Stock movement happens
//! only after the exactly-once local finalize write, through the store's
//! atomic floor decrement.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use pay_core::{NewPayment, Payment, RecordStore};
use pay_horizon::{PaymentVerifier, VerificationResult};
use pay_platform::{GatewayPayment, PlatformGateway};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Checkout-initiation input reported by the wallet client
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub link_id: String,

    #[serde(default)]
    pub pi_payment_id: String,

    #[serde(default)]
    pub payer_uid: String,

    /// Defaults to the link's configured amount
    #[serde(default)]
    pub amount: Option<Decimal>,

    /// Email, question answers, and other free-form annotations
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Result of the completion critical path
#[derive(Clone, Debug)]
pub struct CompletionOutcome {
    /// Processor body merged with `chain_verification`, proxied to the caller
    pub body: Value,

    /// Whether the processor confirmed `developer_completed`
    pub developer_completed: bool,

    /// The audit-signal verification outcome
    pub chain_verification: VerificationResult,
}

/// The payment state machine over store, gateway, and ledger seams
pub struct PaymentOrchestrator {
    store: Arc<dyn RecordStore>,
    gateway: Option<Arc<dyn PlatformGateway>>,
    verifier: PaymentVerifier,
    config: EngineConfig,
}

impl PaymentOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        gateway: Option<Arc<dyn PlatformGateway>>,
        verifier: PaymentVerifier,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            verifier,
            config,
        }
    }

    fn gateway(&self) -> Result<&Arc<dyn PlatformGateway>> {
        self.gateway
            .as_ref()
            .ok_or_else(|| EngineError::Config("Pi API Key not configured".into()))
    }

    /// Stage 1: insert a pending payment for an active, in-stock link.
    ///
    /// The stock gate here is an early-rejection optimization only; two
    /// concurrent requests can both pass it. The conditional decrement at
    /// completion is the correctness backstop.
    pub async fn create_payment(&self, request: CreatePaymentRequest) -> Result<Payment> {
        if request.link_id.trim().is_empty()
            || request.pi_payment_id.trim().is_empty()
            || request.payer_uid.trim().is_empty()
        {
            return Err(EngineError::Validation("Required fields missing".into()));
        }

        let link = self
            .store
            .link(&request.link_id)
            .await?
            .filter(|l| l.active)
            .ok_or_else(|| {
                EngineError::Validation("Checkout link not found or inactive".into())
            })?;

        if link.out_of_stock() {
            return Err(EngineError::Validation("Out of stock".into()));
        }

        let payment = Payment::pending(NewPayment {
            pi_payment_id: request.pi_payment_id,
            link_id: request.link_id,
            payer_uid: request.payer_uid,
            amount: request.amount.unwrap_or(link.amount),
            metadata: request.metadata.unwrap_or_else(|| Value::Object(Default::default())),
        });

        self.store.insert_payment(payment.clone()).await?;

        tracing::info!(
            payment_id = %payment.payment_id,
            pi_payment_id = %payment.pi_payment_id,
            link_id = %payment.link_id,
            "Created pending payment"
        );

        Ok(payment)
    }

    /// Stage 2: server-side approval. Idempotent end to end: re-approval
    /// is a processor-side no-op and the local flag is set-once.
    pub async fn approve(&self, pi_payment_id: &str) -> Result<GatewayPayment> {
        let gateway = self.gateway()?;

        let response = gateway
            .approve(pi_payment_id)
            .await
            .map_err(|e| EngineError::upstream("Failed to approve payment", e))?;

        // Non-critical side effect: mirror the processor flag locally.
        // The processor-side approval already succeeded; a store hiccup
        // must not fail this request.
        match self.store.mark_approved(pi_payment_id).await {
            Ok(true) => {
                tracing::info!(pi_payment_id = %pi_payment_id, "Payment approved");
            }
            Ok(false) => {
                tracing::warn!(pi_payment_id = %pi_payment_id, "No local payment to mark approved");
            }
            Err(e) => {
                tracing::warn!(
                    pi_payment_id = %pi_payment_id,
                    error = %e,
                    "Failed to record approval flag"
                );
            }
        }

        Ok(response)
    }

    /// Stage 3, the critical path: verify the transaction on-chain, ask the
    /// processor to finalize, and apply local side effects exactly once.
    pub async fn complete(&self, pi_payment_id: &str, txid: &str) -> Result<CompletionOutcome> {
        if txid.trim().is_empty() {
            return Err(EngineError::Validation("Transaction ID (txid) required".into()));
        }
        let gateway = self.gateway()?;

        let payment = self
            .store
            .payment_by_pi_id(pi_payment_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Payment not found".into()))?;

        let link = self
            .store
            .link(&payment.link_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Checkout link not found".into()))?;

        // Payout wallet, falling back to the merchant's login address for
        // merchants that predate payout-wallet configuration.
        let recipient = self
            .store
            .merchant(&link.merchant_address)
            .await?
            .and_then(|m| m.payment_wallet_address)
            .unwrap_or_else(|| link.merchant_address.clone());

        let chain = self
            .verifier
            .verify(txid, &recipient, Some(payment.amount))
            .await;

        if !chain.verified {
            tracing::warn!(
                pi_payment_id = %pi_payment_id,
                txid = %txid,
                reason = chain.error.as_deref().unwrap_or("no matching payment"),
                "On-chain verification did not match"
            );
            if self.config.strict_chain_verification {
                return Err(EngineError::Validation(format!(
                    "On-chain verification failed: {}",
                    chain.error.as_deref().unwrap_or("no matching payment")
                )));
            }
        }

        let response = gateway
            .complete(pi_payment_id, txid)
            .await
            .map_err(|e| EngineError::upstream("Failed to complete payment", e))?;

        let developer_completed = response.developer_completed();
        if developer_completed {
            // Conditional pending -> completed write; false means another
            // completion already claimed this payment.
            let finalized = match self
                .store
                .finalize_payment(pi_payment_id, txid, Some(chain.verified))
                .await
            {
                Ok(transitioned) => transitioned,
                Err(e) => {
                    tracing::error!(
                        pi_payment_id = %pi_payment_id,
                        error = %e,
                        "Failed to record payment completion"
                    );
                    false
                }
            };

            if finalized && link.stock > 0 {
                // Non-critical side effect; the store clamps at zero.
                match self.store.decrement_stock(&link.link_id).await {
                    Ok(remaining) => {
                        tracing::info!(link_id = %link.link_id, remaining, "Stock decremented");
                    }
                    Err(e) => {
                        tracing::error!(link_id = %link.link_id, error = %e, "Failed to update stock");
                    }
                }
            }

            tracing::info!(
                pi_payment_id = %pi_payment_id,
                txid = %txid,
                chain_verified = chain.verified,
                "Payment completed"
            );
        } else {
            tracing::warn!(
                pi_payment_id = %pi_payment_id,
                "Processor did not confirm completion; leaving payment pending"
            );
        }

        let mut body = response.raw;
        if let Value::Object(map) = &mut body {
            map.insert(
                "chain_verification".into(),
                serde_json::to_value(&chain).unwrap_or(Value::Null),
            );
        }

        Ok(CompletionOutcome {
            body,
            developer_completed,
            chain_verification: chain,
        })
    }

    /// Processor-side payment status, proxied verbatim
    pub async fn payment_status(&self, pi_payment_id: &str) -> Result<GatewayPayment> {
        let gateway = self.gateway()?;
        gateway
            .payment(pi_payment_id)
            .await
            .map_err(|e| EngineError::upstream("Failed to fetch payment", e))
    }

    /// Cancellation transition: the wallet client reported the payer backed
    /// out (or the processor gave up). Idempotent; a completed payment
    /// never moves back.
    pub async fn cancel(&self, pi_payment_id: &str, reason: &str) -> Result<Payment> {
        let payment = self
            .store
            .payment_by_pi_id(pi_payment_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Payment not found".into()))?;

        if payment.developer_completed {
            return Err(EngineError::Validation("Payment already completed".into()));
        }

        let reason = if reason.trim().is_empty() {
            "cancelled"
        } else {
            reason.trim()
        };

        if self.store.fail_payment(pi_payment_id, reason).await? {
            tracing::info!(pi_payment_id = %pi_payment_id, reason = %reason, "Payment cancelled");
        }

        self.store
            .payment_by_pi_id(pi_payment_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Payment not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::{CheckoutLink, MemoryStore, MerchantUpdate, NewLink, PaymentStatus, PaymentType};
    use pay_horizon::MockLedgerClient;
    use pay_platform::MockGateway;
    use rust_decimal_macros::dec;
    use serde_json::json;

    struct Fixture {
        store: Arc<MemoryStore>,
        gateway: Arc<MockGateway>,
        link_id: String,
    }

    async fn fixture(stock: u32, gateway: MockGateway, ledger: MockLedgerClient) -> (Fixture, PaymentOrchestrator) {
        fixture_with_config(stock, gateway, ledger, EngineConfig::default()).await
    }

    async fn fixture_with_config(
        stock: u32,
        gateway: MockGateway,
        ledger: MockLedgerClient,
        config: EngineConfig,
    ) -> (Fixture, PaymentOrchestrator) {
        let store = Arc::new(MemoryStore::new());
        let link = CheckoutLink::create(NewLink {
            merchant_address: "GLOGIN".into(),
            product_name: "Widget".into(),
            amount: dec!(3.5),
            payment_type: Some(PaymentType::OneTime),
            stock,
            ..Default::default()
        })
        .unwrap();
        let link_id = link.link_id.clone();
        store.insert_link(link).await.unwrap();
        store
            .upsert_merchant(
                "GLOGIN",
                MerchantUpdate {
                    payment_wallet_address: Some("GPAYOUT".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let gateway = Arc::new(gateway);
        let ledger = Arc::new(ledger);
        let orchestrator = PaymentOrchestrator::new(
            store.clone(),
            Some(gateway.clone()),
            PaymentVerifier::new(ledger),
            config,
        );

        (
            Fixture {
                store,
                gateway,
                link_id,
            },
            orchestrator,
        )
    }

    fn create_request(link_id: &str, pi_id: &str) -> CreatePaymentRequest {
        CreatePaymentRequest {
            link_id: link_id.into(),
            pi_payment_id: pi_id.into(),
            payer_uid: "uid_1".into(),
            amount: None,
            metadata: Some(json!({ "email": "buyer@example.com" })),
        }
    }

    fn paying_ledger() -> MockLedgerClient {
        MockLedgerClient::new().with_transaction(MockLedgerClient::payment_tx(
            "tx_1", "GPAYOUT", "3.5", true,
        ))
    }

    #[tokio::test]
    async fn test_create_defaults_amount_to_link() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;

        let payment = orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        assert_eq!(payment.amount, dec!(3.5));
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.metadata["email"], json!("buyer@example.com"));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;

        let err = orchestrator
            .create_payment(CreatePaymentRequest {
                link_id: fx.link_id.clone(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_inactive_link() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        fx.store
            .update_link(
                &fx.link_id,
                pay_core::LinkUpdate {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_exhausted_stock() {
        let (fx, orchestrator) = fixture(1, MockGateway::new(), paying_ledger()).await;
        fx.store.decrement_stock(&fx.link_id).await.unwrap();

        let err = orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap_err();

        match err {
            EngineError::Validation(msg) => assert_eq!(msg, "Out of stock"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unlimited_stock_never_gates_creation() {
        let (fx, orchestrator) = fixture(0, MockGateway::new(), paying_ledger()).await;

        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_approve_is_idempotent() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        orchestrator.approve("pi_1").await.unwrap();
        let first = fx.store.payment_by_pi_id("pi_1").await.unwrap().unwrap();

        orchestrator.approve("pi_1").await.unwrap();
        let second = fx.store.payment_by_pi_id("pi_1").await.unwrap().unwrap();

        assert!(first.developer_approved);
        assert_eq!(first.developer_approved, second.developer_approved);
        assert_eq!(first.status, second.status);
        assert_eq!(fx.gateway.approve_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_operations_require_configured_gateway() {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = PaymentOrchestrator::new(
            store,
            None,
            PaymentVerifier::new(Arc::new(MockLedgerClient::new())),
            EngineConfig::default(),
        );

        assert!(matches!(
            orchestrator.approve("pi_1").await.unwrap_err(),
            EngineError::Config(_)
        ));
        assert!(matches!(
            orchestrator.complete("pi_1", "tx_1").await.unwrap_err(),
            EngineError::Config(_)
        ));
        assert!(matches!(
            orchestrator.payment_status("pi_1").await.unwrap_err(),
            EngineError::Config(_)
        ));
    }

    #[tokio::test]
    async fn test_complete_happy_path() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        let outcome = orchestrator.complete("pi_1", "tx_1").await.unwrap();

        assert!(outcome.developer_completed);
        assert!(outcome.chain_verification.verified);
        assert!(outcome.body["chain_verification"]["verified"].as_bool().unwrap());

        let payment = fx.store.payment_by_pi_id("pi_1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.developer_completed);
        assert_eq!(payment.tx_hash.as_deref(), Some("tx_1"));
        assert!(payment.paid_at.is_some());
        assert_eq!(payment.metadata["chain_verified"], json!(true));

        let link = fx.store.link(&fx.link_id).await.unwrap().unwrap();
        assert_eq!(link.current_stock, 2);
    }

    #[tokio::test]
    async fn test_repeat_completion_decrements_once() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();
        // Two units already sold elsewhere
        fx.store.decrement_stock(&fx.link_id).await.unwrap();
        fx.store.decrement_stock(&fx.link_id).await.unwrap();

        orchestrator.complete("pi_1", "tx_1").await.unwrap();
        let link = fx.store.link(&fx.link_id).await.unwrap().unwrap();
        assert_eq!(link.current_stock, 0);

        // Retried completion confirms again but must not decrement further
        orchestrator.complete("pi_1", "tx_1").await.unwrap();
        let link = fx.store.link(&fx.link_id).await.unwrap().unwrap();
        assert_eq!(link.current_stock, 0);
        assert_eq!(fx.gateway.complete_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unlimited_stock_untouched_by_completion() {
        let (fx, orchestrator) = fixture(0, MockGateway::new(), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        orchestrator.complete("pi_1", "tx_1").await.unwrap();

        let link = fx.store.link(&fx.link_id).await.unwrap().unwrap();
        assert_eq!(link.current_stock, 0);
        assert_eq!(link.stock, 0);
    }

    #[tokio::test]
    async fn test_verification_failure_is_not_fatal_by_default() {
        let ledger = MockLedgerClient::new().with_transaction(MockLedgerClient::payment_tx(
            "tx_1", "GELSEWHERE", "3.5", true,
        ));
        let (fx, orchestrator) = fixture(3, MockGateway::new(), ledger).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        let outcome = orchestrator.complete("pi_1", "tx_1").await.unwrap();

        // Processor confirmation still releases the goods; the mismatch is
        // recorded as an audit annotation.
        assert!(outcome.developer_completed);
        assert!(!outcome.chain_verification.verified);

        let payment = fx.store.payment_by_pi_id("pi_1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.metadata["chain_verified"], json!(false));
    }

    #[tokio::test]
    async fn test_ledger_outage_is_not_fatal_by_default() {
        let (fx, orchestrator) =
            fixture(3, MockGateway::new(), MockLedgerClient::failing()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        let outcome = orchestrator.complete("pi_1", "tx_1").await.unwrap();
        assert!(outcome.developer_completed);
        assert!(!outcome.chain_verification.verified);
    }

    #[tokio::test]
    async fn test_strict_mode_blocks_unverified_completion() {
        let ledger = MockLedgerClient::new().with_transaction(MockLedgerClient::payment_tx(
            "tx_1", "GELSEWHERE", "3.5", true,
        ));
        let (fx, orchestrator) = fixture_with_config(
            3,
            MockGateway::new(),
            ledger,
            EngineConfig {
                strict_chain_verification: true,
            },
        )
        .await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        let err = orchestrator.complete("pi_1", "tx_1").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        // The processor was never asked to finalize
        assert!(fx.gateway.complete_calls().is_empty());

        let payment = fx.store.payment_by_pi_id("pi_1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_unconfirmed_completion_leaves_payment_pending() {
        let (fx, orchestrator) =
            fixture(3, MockGateway::withholding_completion(), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        let outcome = orchestrator.complete("pi_1", "tx_1").await.unwrap();
        assert!(!outcome.developer_completed);

        let payment = fx.store.payment_by_pi_id("pi_1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(!payment.developer_completed);

        let link = fx.store.link(&fx.link_id).await.unwrap().unwrap();
        assert_eq!(link.current_stock, 3);
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates_upstream_status() {
        let (fx, orchestrator) = fixture(3, MockGateway::failing(503), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        let err = orchestrator.complete("pi_1", "tx_1").await.unwrap_err();
        match err {
            EngineError::Upstream { status, .. } => assert_eq!(status, Some(503)),
            other => panic!("unexpected: {other:?}"),
        }

        // No local mutation happened
        let payment = fx.store.payment_by_pi_id("pi_1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        let link = fx.store.link(&fx.link_id).await.unwrap().unwrap();
        assert_eq!(link.current_stock, 3);
    }

    #[tokio::test]
    async fn test_complete_requires_txid() {
        let (_fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        let err = orchestrator.complete("pi_1", "  ").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_complete_unknown_payment_is_not_found() {
        let (_fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        let err = orchestrator.complete("pi_missing", "tx_1").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent_and_final() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();

        let cancelled = orchestrator.cancel("pi_1", "payer backed out").await.unwrap();
        assert_eq!(cancelled.status, PaymentStatus::Failed);
        assert_eq!(
            cancelled.metadata["failure_reason"],
            json!("payer backed out")
        );

        // Repeat cancel is a no-op
        let again = orchestrator.cancel("pi_1", "again").await.unwrap();
        assert_eq!(again.status, PaymentStatus::Failed);
        assert_eq!(again.metadata["failure_reason"], json!("payer backed out"));
    }

    #[tokio::test]
    async fn test_cancel_rejects_completed_payment() {
        let (fx, orchestrator) = fixture(3, MockGateway::new(), paying_ledger()).await;
        orchestrator
            .create_payment(create_request(&fx.link_id, "pi_1"))
            .await
            .unwrap();
        orchestrator.complete("pi_1", "tx_1").await.unwrap();

        let err = orchestrator.cancel("pi_1", "too late").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_recipient_falls_back_to_login_address() {
        // Merchant never configured a payout wallet; the transaction pays
        // the login address and still verifies.
        let ledger = MockLedgerClient::new().with_transaction(MockLedgerClient::payment_tx(
            "tx_1", "GLOGIN", "3.5", true,
        ));
        let store = Arc::new(MemoryStore::new());
        let link = CheckoutLink::create(NewLink {
            merchant_address: "GLOGIN".into(),
            product_name: "Widget".into(),
            amount: dec!(3.5),
            payment_type: Some(PaymentType::OneTime),
            stock: 0,
            ..Default::default()
        })
        .unwrap();
        let link_id = link.link_id.clone();
        store.insert_link(link).await.unwrap();

        let orchestrator = PaymentOrchestrator::new(
            store.clone(),
            Some(Arc::new(MockGateway::new())),
            PaymentVerifier::new(Arc::new(ledger)),
            EngineConfig::default(),
        );
        orchestrator
            .create_payment(create_request(&link_id, "pi_1"))
            .await
            .unwrap();

        let outcome = orchestrator.complete("pi_1", "tx_1").await.unwrap();
        assert!(outcome.chain_verification.verified);
        assert_eq!(
            outcome.chain_verification.recipient.as_deref(),
            Some("GLOGIN")
        );
    }
}
