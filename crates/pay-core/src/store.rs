//! Record Store
//!
//! Storage abstraction for links, payments, merchants, and products.
//! The conditional-update methods (`decrement_stock`, `mark_approved`,
//! `finalize_payment`) are the correctness backstops of the payment flow:
//! each is a single atomic read-check-write against one record.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{CoreError, Result};
use crate::link::{CheckoutLink, LinkUpdate};
use crate::merchant::{Merchant, MerchantUpdate, Product};
use crate::payment::{Payment, PaymentStatus};

/// Durable record storage (external collaborator)
#[async_trait]
pub trait RecordStore: Send + Sync {
    // --- checkout links ---

    async fn insert_link(&self, link: CheckoutLink) -> Result<()>;

    async fn link(&self, link_id: &str) -> Result<Option<CheckoutLink>>;

    /// Links for a merchant, newest first
    async fn links_for_merchant(&self, merchant_address: &str) -> Result<Vec<CheckoutLink>>;

    /// Merge an update into a link; false when the link does not exist
    async fn update_link(&self, link_id: &str, update: LinkUpdate) -> Result<bool>;

    /// Atomic decrement-with-floor: `current_stock = max(current_stock - 1, 0)`
    /// in one conditional write. No-op for unlimited-stock links. Returns the
    /// new remaining stock.
    async fn decrement_stock(&self, link_id: &str) -> Result<u32>;

    // --- payments ---

    async fn insert_payment(&self, payment: Payment) -> Result<()>;

    async fn payment(&self, payment_id: &str) -> Result<Option<Payment>>;

    async fn payment_by_pi_id(&self, pi_payment_id: &str) -> Result<Option<Payment>>;

    /// Payments against a link, newest first
    async fn payments_for_link(&self, link_id: &str) -> Result<Vec<Payment>>;

    /// Set the processor-approval mirror flag. Idempotent; false when no
    /// payment carries the given processor id.
    async fn mark_approved(&self, pi_payment_id: &str) -> Result<bool>;

    /// Conditional pending -> completed transition: set status, tx hash,
    /// `paid_at`, the `developer_completed` flag, and the chain-verification
    /// annotation in one write. Returns false (and writes nothing) when the
    /// payment was already completed, so completion side effects fire
    /// exactly once.
    async fn finalize_payment(
        &self,
        pi_payment_id: &str,
        tx_hash: &str,
        chain_verified: Option<bool>,
    ) -> Result<bool>;

    /// Conditional pending -> failed transition (client cancellation or
    /// unrecoverable processor error). Returns false when the payment is
    /// already past pending; a completed payment never moves back.
    async fn fail_payment(&self, pi_payment_id: &str, reason: &str) -> Result<bool>;

    // --- merchants ---

    /// Create-if-absent, else merge; never clobbers omitted fields
    async fn upsert_merchant(
        &self,
        wallet_address: &str,
        update: MerchantUpdate,
    ) -> Result<Merchant>;

    async fn merchant(&self, wallet_address: &str) -> Result<Option<Merchant>>;

    // --- products ---

    async fn insert_product(
        &self,
        name: &str,
        description: &str,
        merchant_address: &str,
    ) -> Result<Product>;

    /// Products for a merchant, newest first
    async fn products_for_merchant(&self, merchant_address: &str) -> Result<Vec<Product>>;
}

/// In-memory record store (for development and tests)
pub struct MemoryStore {
    links: RwLock<HashMap<String, CheckoutLink>>,
    payments: RwLock<HashMap<String, Payment>>,
    by_pi_id: RwLock<HashMap<String, String>>,
    merchants: RwLock<HashMap<String, Merchant>>,
    products: RwLock<Vec<Product>>,
    next_product_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
            payments: RwLock::new(HashMap::new()),
            by_pi_id: RwLock::new(HashMap::new()),
            merchants: RwLock::new(HashMap::new()),
            products: RwLock::new(Vec::new()),
            next_product_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_link(&self, link: CheckoutLink) -> Result<()> {
        let mut links = self.links.write().unwrap();
        links.insert(link.link_id.clone(), link);
        Ok(())
    }

    async fn link(&self, link_id: &str) -> Result<Option<CheckoutLink>> {
        let links = self.links.read().unwrap();
        Ok(links.get(link_id).cloned())
    }

    async fn links_for_merchant(&self, merchant_address: &str) -> Result<Vec<CheckoutLink>> {
        let links = self.links.read().unwrap();
        let mut rows: Vec<CheckoutLink> = links
            .values()
            .filter(|l| l.merchant_address == merchant_address)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_link(&self, link_id: &str, update: LinkUpdate) -> Result<bool> {
        let mut links = self.links.write().unwrap();
        match links.get_mut(link_id) {
            Some(link) => {
                link.apply(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn decrement_stock(&self, link_id: &str) -> Result<u32> {
        let mut links = self.links.write().unwrap();
        let link = links
            .get_mut(link_id)
            .ok_or(CoreError::NotFound("Checkout link"))?;
        if link.stock == 0 {
            return Ok(0);
        }
        link.current_stock = link.current_stock.saturating_sub(1);
        Ok(link.current_stock)
    }

    async fn insert_payment(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().unwrap();
        let mut by_pi_id = self.by_pi_id.write().unwrap();

        by_pi_id.insert(payment.pi_payment_id.clone(), payment.payment_id.clone());
        payments.insert(payment.payment_id.clone(), payment);
        Ok(())
    }

    async fn payment(&self, payment_id: &str) -> Result<Option<Payment>> {
        let payments = self.payments.read().unwrap();
        Ok(payments.get(payment_id).cloned())
    }

    async fn payment_by_pi_id(&self, pi_payment_id: &str) -> Result<Option<Payment>> {
        let by_pi_id = self.by_pi_id.read().unwrap();
        let payments = self.payments.read().unwrap();

        Ok(by_pi_id
            .get(pi_payment_id)
            .and_then(|id| payments.get(id))
            .cloned())
    }

    async fn payments_for_link(&self, link_id: &str) -> Result<Vec<Payment>> {
        let payments = self.payments.read().unwrap();
        let mut rows: Vec<Payment> = payments
            .values()
            .filter(|p| p.link_id == link_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_approved(&self, pi_payment_id: &str) -> Result<bool> {
        let by_pi_id = self.by_pi_id.read().unwrap();
        let mut payments = self.payments.write().unwrap();

        match by_pi_id.get(pi_payment_id).and_then(|id| payments.get_mut(id)) {
            Some(payment) => {
                payment.developer_approved = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn finalize_payment(
        &self,
        pi_payment_id: &str,
        tx_hash: &str,
        chain_verified: Option<bool>,
    ) -> Result<bool> {
        let by_pi_id = self.by_pi_id.read().unwrap();
        let mut payments = self.payments.write().unwrap();

        let Some(payment) = by_pi_id.get(pi_payment_id).and_then(|id| payments.get_mut(id))
        else {
            return Err(CoreError::NotFound("Payment"));
        };

        if payment.developer_completed {
            return Ok(false);
        }

        payment.status = PaymentStatus::Completed;
        payment.developer_completed = true;
        payment.tx_hash = Some(tx_hash.to_string());
        payment.paid_at = Some(Utc::now());
        if let Some(verified) = chain_verified {
            if let serde_json::Value::Object(map) = &mut payment.metadata {
                map.insert("chain_verified".into(), verified.into());
            } else {
                payment.metadata = serde_json::json!({ "chain_verified": verified });
            }
        }
        Ok(true)
    }

    async fn fail_payment(&self, pi_payment_id: &str, reason: &str) -> Result<bool> {
        let by_pi_id = self.by_pi_id.read().unwrap();
        let mut payments = self.payments.write().unwrap();

        let Some(payment) = by_pi_id.get(pi_payment_id).and_then(|id| payments.get_mut(id))
        else {
            return Err(CoreError::NotFound("Payment"));
        };

        if !payment.status.can_transition_to(PaymentStatus::Failed) {
            return Ok(false);
        }

        payment.status = PaymentStatus::Failed;
        if let serde_json::Value::Object(map) = &mut payment.metadata {
            map.insert("failure_reason".into(), reason.into());
        } else {
            payment.metadata = serde_json::json!({ "failure_reason": reason });
        }
        Ok(true)
    }

    async fn upsert_merchant(
        &self,
        wallet_address: &str,
        update: MerchantUpdate,
    ) -> Result<Merchant> {
        let mut merchants = self.merchants.write().unwrap();
        let merchant = merchants
            .entry(wallet_address.to_string())
            .or_insert_with(|| Merchant::new(wallet_address));
        merchant.merge(update);
        Ok(merchant.clone())
    }

    async fn merchant(&self, wallet_address: &str) -> Result<Option<Merchant>> {
        let merchants = self.merchants.read().unwrap();
        Ok(merchants.get(wallet_address).cloned())
    }

    async fn insert_product(
        &self,
        name: &str,
        description: &str,
        merchant_address: &str,
    ) -> Result<Product> {
        let product = Product {
            id: self.next_product_id.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            description: description.to_string(),
            merchant_address: merchant_address.to_string(),
            created_at: Utc::now(),
        };

        let mut products = self.products.write().unwrap();
        products.push(product.clone());
        Ok(product)
    }

    async fn products_for_merchant(&self, merchant_address: &str) -> Result<Vec<Product>> {
        let products = self.products.read().unwrap();
        let mut rows: Vec<Product> = products
            .iter()
            .filter(|p| p.merchant_address == merchant_address)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
