//! Payments
//!
//! A payment row mirrors one processor-side payment intent. Status moves
//! strictly forward; `developer_completed` is the set-once flag gating the
//! stock-decrement side effect.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Local payment lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Valid forward transitions from this state
    pub fn valid_transitions(&self) -> &'static [PaymentStatus] {
        match self {
            PaymentStatus::Pending => &[PaymentStatus::Completed, PaymentStatus::Failed],
            PaymentStatus::Completed => &[PaymentStatus::Refunded],
            PaymentStatus::Failed | PaymentStatus::Refunded => &[],
        }
    }

    pub fn can_transition_to(&self, target: PaymentStatus) -> bool {
        self.valid_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer payment against a checkout link
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    /// Locally generated identity (`pay_<hex>`)
    pub payment_id: String,

    /// Identity assigned by the payment processor
    pub pi_payment_id: String,

    pub link_id: String,

    /// Payer identity reported by the wallet client
    pub payer_uid: String,

    pub amount: Decimal,

    pub status: PaymentStatus,

    /// On-chain transaction hash, set on completion
    #[serde(default)]
    pub tx_hash: Option<String>,

    /// Stamped only when the processor confirms completion
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub refunded: bool,

    /// Free-form annotations: email, question answers, chain verification
    #[serde(default)]
    pub metadata: serde_json::Value,

    /// Mirrors processor-side approval; set-once-effectively
    #[serde(default)]
    pub developer_approved: bool,

    /// Mirrors processor-side completion; flips 0 -> 1 at most once
    #[serde(default)]
    pub developer_completed: bool,

    pub created_at: DateTime<Utc>,
}

/// Input for inserting a pending payment
#[derive(Clone, Debug)]
pub struct NewPayment {
    pub pi_payment_id: String,
    pub link_id: String,
    pub payer_uid: String,
    pub amount: Decimal,
    pub metadata: serde_json::Value,
}

impl Payment {
    /// Generate an opaque payment token
    pub fn generate_id() -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("pay_{}", &hex[..16])
    }

    /// Build a fresh pending payment
    pub fn pending(new: NewPayment) -> Self {
        Self {
            payment_id: Self::generate_id(),
            pi_payment_id: new.pi_payment_id,
            link_id: new.link_id,
            payer_uid: new.payer_uid,
            amount: new.amount,
            status: PaymentStatus::Pending,
            tx_hash: None,
            paid_at: None,
            refunded: false,
            metadata: new.metadata,
            developer_approved: false,
            developer_completed: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_payment() -> Payment {
        Payment::pending(NewPayment {
            pi_payment_id: "pi_abc".into(),
            link_id: "link_1".into(),
            payer_uid: "uid_1".into(),
            amount: dec!(2.5),
            metadata: serde_json::json!({}),
        })
    }

    #[test]
    fn test_new_payment_is_pending() {
        let payment = new_payment();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(!payment.developer_approved);
        assert!(!payment.developer_completed);
        assert!(payment.paid_at.is_none());
        assert!(payment.payment_id.starts_with("pay_"));
    }

    #[test]
    fn test_status_moves_strictly_forward() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Pending));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Completed.can_transition_to(PaymentStatus::Refunded));
    }

    #[test]
    fn test_terminal_states() {
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Refunded.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Completed.is_terminal());
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(
            serde_json::to_value(PaymentStatus::Pending).unwrap(),
            serde_json::json!("pending")
        );
        assert_eq!(
            serde_json::to_value(PaymentStatus::Completed).unwrap(),
            serde_json::json!("completed")
        );
    }
}
