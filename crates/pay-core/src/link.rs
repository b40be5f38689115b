//! Checkout Links
//!
//! A checkout link is a merchant-published, shareable offer configuration
//! that customers pay against. Stock bookkeeping lives here; the decrement
//! itself happens through the record store as a single conditional write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// How a link charges the customer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Free,
    #[serde(rename = "One-time")]
    OneTime,
    Recurring,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Free => "Free",
            PaymentType::OneTime => "One-time",
            PaymentType::Recurring => "Recurring",
        }
    }

    /// Parse the wire string; anything else is invalid input, not a default
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Free" => Some(PaymentType::Free),
            "One-time" => Some(PaymentType::OneTime),
            "Recurring" => Some(PaymentType::Recurring),
            _ => None,
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, PaymentType::Free)
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A free-form question shown on the checkout page
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Question {
    pub title: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub optional: bool,
}

/// A merchant's checkout link
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutLink {
    /// Opaque unique token (`link_<hex>`)
    pub link_id: String,

    /// Owning merchant's login address
    pub merchant_address: String,

    pub product_name: String,

    #[serde(default)]
    pub description: String,

    /// Charge amount; always zero for free links
    pub amount: Decimal,

    pub payment_type: PaymentType,

    /// Configured stock; 0 means unlimited
    #[serde(default)]
    pub stock: u32,

    /// Remaining stock; decremented on completion, floored at 0
    #[serde(default)]
    pub current_stock: u32,

    pub active: bool,

    #[serde(default)]
    pub redirect_url: String,

    #[serde(default)]
    pub internal_name: String,

    #[serde(default)]
    pub questions: Vec<Question>,

    #[serde(default)]
    pub waitlist_enabled: bool,

    #[serde(default)]
    pub auto_expire_days: Option<u32>,

    #[serde(default)]
    pub free_trial_days: Option<u32>,

    #[serde(default)]
    pub initial_fee: Decimal,

    #[serde(default)]
    pub split_pay_installments: u32,

    #[serde(default)]
    pub cancellation_discount_percent: Decimal,

    #[serde(default)]
    pub cancellation_discount_type: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a checkout link
#[derive(Clone, Debug, Default)]
pub struct NewLink {
    pub merchant_address: String,
    pub product_name: String,
    pub description: String,
    pub amount: Decimal,
    pub payment_type: Option<PaymentType>,
    pub stock: u32,
    pub redirect_url: String,
    pub internal_name: String,
    pub questions: Vec<Question>,
    pub waitlist_enabled: bool,
    pub auto_expire_days: Option<u32>,
    pub free_trial_days: Option<u32>,
    pub initial_fee: Decimal,
    pub split_pay_installments: u32,
    pub cancellation_discount_percent: Decimal,
    pub cancellation_discount_type: Option<String>,
}

/// Partial update; only present fields change (merge-not-overwrite)
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LinkUpdate {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub payment_type: Option<PaymentType>,
    pub stock: Option<u32>,
    pub redirect_url: Option<String>,
    pub internal_name: Option<String>,
    pub questions: Option<Vec<Question>>,
    pub waitlist_enabled: Option<bool>,
    pub auto_expire_days: Option<u32>,
    pub active: Option<bool>,
    pub free_trial_days: Option<u32>,
    pub initial_fee: Option<Decimal>,
    pub split_pay_installments: Option<u32>,
    pub cancellation_discount_percent: Option<Decimal>,
    pub cancellation_discount_type: Option<String>,
}

impl LinkUpdate {
    /// True when the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.payment_type.is_none()
            && self.stock.is_none()
            && self.redirect_url.is_none()
            && self.internal_name.is_none()
            && self.questions.is_none()
            && self.waitlist_enabled.is_none()
            && self.auto_expire_days.is_none()
            && self.active.is_none()
            && self.free_trial_days.is_none()
            && self.initial_fee.is_none()
            && self.split_pay_installments.is_none()
            && self.cancellation_discount_percent.is_none()
            && self.cancellation_discount_type.is_none()
    }
}

impl CheckoutLink {
    /// Generate an opaque link token
    pub fn generate_id() -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("link_{}", &hex[..16])
    }

    /// Validate and build a new active link.
    ///
    /// Free links store amount 0 regardless of input; finite stock starts
    /// with `current_stock == stock`.
    pub fn create(new: NewLink) -> Result<Self> {
        let merchant_address = new.merchant_address.trim().to_string();
        if merchant_address.is_empty() {
            return Err(CoreError::Validation("Merchant address is required".into()));
        }

        let product_name = new.product_name.trim().to_string();
        if product_name.is_empty() {
            return Err(CoreError::Validation("Product name is required".into()));
        }

        let Some(payment_type) = new.payment_type else {
            return Err(CoreError::Validation(
                "Valid payment type is required (Free, One-time, or Recurring)".into(),
            ));
        };

        let amount = if payment_type.is_paid() {
            if new.amount < Decimal::ZERO {
                return Err(CoreError::Validation(
                    "Valid amount greater than or equal to 0 is required for paid payment types"
                        .into(),
                ));
            }
            new.amount
        } else {
            Decimal::ZERO
        };

        Ok(Self {
            link_id: Self::generate_id(),
            merchant_address,
            product_name,
            description: new.description.trim().to_string(),
            amount,
            payment_type,
            stock: new.stock,
            current_stock: new.stock,
            active: true,
            redirect_url: new.redirect_url.trim().to_string(),
            internal_name: new.internal_name.trim().to_string(),
            questions: new.questions,
            waitlist_enabled: new.waitlist_enabled,
            auto_expire_days: new.auto_expire_days,
            free_trial_days: new.free_trial_days,
            initial_fee: new.initial_fee,
            split_pay_installments: new.split_pay_installments,
            cancellation_discount_percent: new.cancellation_discount_percent,
            cancellation_discount_type: new.cancellation_discount_type,
            created_at: Utc::now(),
        })
    }

    /// Merge a partial update into this link.
    ///
    /// Switching to Free forces the amount to 0; shrinking finite stock
    /// clamps `current_stock` so it never exceeds `stock`.
    pub fn apply(&mut self, update: LinkUpdate) {
        if let Some(name) = update.product_name {
            self.product_name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(payment_type) = update.payment_type {
            self.payment_type = payment_type;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
            if stock == 0 {
                self.current_stock = 0;
            } else {
                self.current_stock = self.current_stock.min(stock);
            }
        }
        if let Some(redirect_url) = update.redirect_url {
            self.redirect_url = redirect_url;
        }
        if let Some(internal_name) = update.internal_name {
            self.internal_name = internal_name;
        }
        if let Some(questions) = update.questions {
            self.questions = questions;
        }
        if let Some(waitlist_enabled) = update.waitlist_enabled {
            self.waitlist_enabled = waitlist_enabled;
        }
        if let Some(days) = update.auto_expire_days {
            self.auto_expire_days = Some(days);
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(days) = update.free_trial_days {
            self.free_trial_days = Some(days);
        }
        if let Some(fee) = update.initial_fee {
            self.initial_fee = fee;
        }
        if let Some(installments) = update.split_pay_installments {
            self.split_pay_installments = installments;
        }
        if let Some(percent) = update.cancellation_discount_percent {
            self.cancellation_discount_percent = percent;
        }
        if let Some(kind) = update.cancellation_discount_type {
            self.cancellation_discount_type = Some(kind);
        }
        if !self.payment_type.is_paid() {
            self.amount = Decimal::ZERO;
        }
    }

    /// A finite-stock link with nothing left cannot take new payments.
    /// Unlimited-stock links (stock 0) are never gated.
    pub fn out_of_stock(&self) -> bool {
        self.stock > 0 && self.current_stock == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn paid_link() -> NewLink {
        NewLink {
            merchant_address: "GMERCHANT".into(),
            product_name: "Widget".into(),
            amount: dec!(5),
            payment_type: Some(PaymentType::OneTime),
            stock: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_link_id_format() {
        let id = CheckoutLink::generate_id();
        assert!(id.starts_with("link_"));
        assert_eq!(id.len(), "link_".len() + 16);
    }

    #[test]
    fn test_free_link_forces_zero_amount() {
        let link = CheckoutLink::create(NewLink {
            amount: dec!(42),
            payment_type: Some(PaymentType::Free),
            ..paid_link()
        })
        .unwrap();
        assert_eq!(link.amount, Decimal::ZERO);
    }

    #[test]
    fn test_paid_link_keeps_amount() {
        let link = CheckoutLink::create(paid_link()).unwrap();
        assert_eq!(link.amount, dec!(5));
        assert!(link.active);
        assert_eq!(link.current_stock, 3);
    }

    #[test]
    fn test_missing_merchant_rejected() {
        let result = CheckoutLink::create(NewLink {
            merchant_address: "  ".into(),
            ..paid_link()
        });
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_missing_payment_type_rejected() {
        let result = CheckoutLink::create(NewLink {
            payment_type: None,
            ..paid_link()
        });
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_update_clamps_current_stock() {
        let mut link = CheckoutLink::create(paid_link()).unwrap();
        assert_eq!(link.current_stock, 3);

        link.apply(LinkUpdate {
            stock: Some(1),
            ..Default::default()
        });
        assert_eq!(link.stock, 1);
        assert_eq!(link.current_stock, 1);
    }

    #[test]
    fn test_unlimited_stock_never_gates() {
        let link = CheckoutLink::create(NewLink {
            stock: 0,
            ..paid_link()
        })
        .unwrap();
        assert_eq!(link.current_stock, 0);
        assert!(!link.out_of_stock());
    }

    #[test]
    fn test_payment_type_parse() {
        assert_eq!(PaymentType::parse("One-time"), Some(PaymentType::OneTime));
        assert_eq!(PaymentType::parse("one-time"), None);
        assert_eq!(PaymentType::parse("Subscription"), None);
    }
}
