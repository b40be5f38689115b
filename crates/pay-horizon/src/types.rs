//! Ledger Wire Types
//!
//! Typed views over Horizon JSON. Unknown fields are preserved through a
//! flattened map so passthrough endpoints can proxy records losslessly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cursor-based pagination passthrough for listing endpoints
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub order: Option<String>,
}

impl PageQuery {
    /// Query pairs for the upstream request; absent fields are omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(ref cursor) = self.cursor {
            params.push(("cursor", cursor.clone()));
        }
        if let Some(ref order) = self.order {
            params.push(("order", order.clone()));
        }
        params
    }
}

/// One operation inside a ledger transaction.
///
/// A transaction may batch several operations; only payment-type ones
/// (`type == "payment"` or `type_i == 1`) count toward verification.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "type", default)]
    pub op_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_i: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Ledger amounts are decimal strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Operation {
    pub fn is_payment(&self) -> bool {
        self.op_type == "payment" || self.type_i == Some(1)
    }

    /// Destination address; Horizon uses `to` for payments, `destination`
    /// for account-creation style operations
    pub fn recipient(&self) -> Option<&str> {
        self.to.as_deref().or(self.destination.as_deref())
    }

    /// Parsed amount, zero when absent or malformed
    pub fn parsed_amount(&self) -> Decimal {
        self.amount
            .as_deref()
            .and_then(|a| a.parse().ok())
            .unwrap_or(Decimal::ZERO)
    }
}

/// A ledger transaction record with its batched operations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub hash: String,

    #[serde(default)]
    pub successful: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_operation_recipient_prefers_to() {
        let op = Operation {
            to: Some("GDEST".into()),
            destination: Some("GOTHER".into()),
            ..Default::default()
        };
        assert_eq!(op.recipient(), Some("GDEST"));
    }

    #[test]
    fn test_operation_payment_detection() {
        let by_name = Operation {
            op_type: "payment".into(),
            ..Default::default()
        };
        let by_code = Operation {
            op_type: "unknown".into(),
            type_i: Some(1),
            ..Default::default()
        };
        let neither = Operation {
            op_type: "create_account".into(),
            type_i: Some(0),
            ..Default::default()
        };
        assert!(by_name.is_payment());
        assert!(by_code.is_payment());
        assert!(!neither.is_payment());
    }

    #[test]
    fn test_malformed_amount_parses_to_zero() {
        let op = Operation {
            amount: Some("not-a-number".into()),
            ..Default::default()
        };
        assert_eq!(op.parsed_amount(), Decimal::ZERO);

        let ok = Operation {
            amount: Some("3.1400000".into()),
            ..Default::default()
        };
        assert_eq!(ok.parsed_amount(), dec!(3.14));
    }

    #[test]
    fn test_transaction_round_trips_unknown_fields() {
        let raw = serde_json::json!({
            "hash": "abc",
            "successful": true,
            "fee_charged": "100",
            "operations": []
        });
        let record: TransactionRecord = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["fee_charged"], serde_json::json!("100"));
    }
}
