//! Payment Verification
//!
//! Decides whether a ledger transaction constitutes a valid payment to an
//! expected recipient. Fails closed: a missing, unsuccessful, or unreadable
//! transaction is unverified. The result is a reported value, never an
//! error: callers store it for support triage, they do not catch it.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::client::LedgerClient;
use crate::error::HorizonError;
use crate::types::Operation;

/// Absolute tolerance for amount comparison; absorbs ledger-precision
/// rounding between the stored amount and the on-chain string
const AMOUNT_TOLERANCE: Decimal = dec!(0.0001);

/// Outcome of verifying one transaction hash against an expected payment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,

    /// Matched recipient address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    /// Matched on-chain amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Ledger close time of the transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Why verification failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Diagnostic context on mismatch: what was expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_recipient: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_amount: Option<Decimal>,

    /// Diagnostic context on mismatch: what the transaction contained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_operations: Option<Vec<Operation>>,
}

impl VerificationResult {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            verified: false,
            recipient: None,
            amount: None,
            timestamp: None,
            error: Some(error.into()),
            expected_recipient: None,
            expected_amount: None,
            payment_operations: None,
        }
    }

    fn mismatch(
        error: impl Into<String>,
        expected_recipient: &str,
        expected_amount: Option<Decimal>,
        payment_operations: Vec<Operation>,
    ) -> Self {
        Self {
            expected_recipient: Some(expected_recipient.to_string()),
            expected_amount,
            payment_operations: Some(payment_operations),
            ..Self::failure(error)
        }
    }
}

/// Pure query+decision payment verifier over a ledger client
#[derive(Clone)]
pub struct PaymentVerifier {
    ledger: Arc<dyn LedgerClient>,
}

impl PaymentVerifier {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Verify that `tx_hash` pays `expected_recipient`.
    ///
    /// A match requires a payment operation whose destination equals the
    /// recipient exactly (case-sensitive) and, when `expected_amount` is
    /// given, whose amount is within `0.0001` absolute tolerance.
    pub async fn verify(
        &self,
        tx_hash: &str,
        expected_recipient: &str,
        expected_amount: Option<Decimal>,
    ) -> VerificationResult {
        let transaction = match self.ledger.transaction(tx_hash).await {
            Ok(transaction) => transaction,
            Err(HorizonError::NotFound(_)) => {
                return VerificationResult::failure("Transaction not found");
            }
            Err(e) => return VerificationResult::failure(e.to_string()),
        };

        if !transaction.successful {
            return VerificationResult::failure("Transaction was not successful");
        }

        let payment_ops: Vec<Operation> = transaction
            .operations
            .iter()
            .filter(|op| op.is_payment())
            .cloned()
            .collect();

        if payment_ops.is_empty() {
            return VerificationResult::mismatch(
                "No payment operations found in transaction",
                expected_recipient,
                expected_amount,
                payment_ops,
            );
        }

        let matched = payment_ops.iter().find(|op| {
            let recipient_match = op.recipient() == Some(expected_recipient);
            let amount_match = expected_amount
                .is_none_or(|expected| (op.parsed_amount() - expected).abs() < AMOUNT_TOLERANCE);
            recipient_match && amount_match
        });

        match matched {
            Some(op) => VerificationResult {
                verified: true,
                recipient: op.recipient().map(str::to_string),
                amount: Some(op.parsed_amount()),
                timestamp: transaction.created_at.clone(),
                error: None,
                expected_recipient: None,
                expected_amount: None,
                payment_operations: None,
            },
            None => VerificationResult::mismatch(
                "No matching payment found in transaction",
                expected_recipient,
                expected_amount,
                payment_ops,
            ),
        }
    }
}
