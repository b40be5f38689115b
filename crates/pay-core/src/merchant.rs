//! Merchants & Products
//!
//! A merchant's login identity is its wallet address; the payout wallet is
//! a separate, explicitly configured address that on-chain payments must
//! actually reach. Merchant upserts merge rather than overwrite so a login
//! refresh never clobbers a configured payout wallet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merchant account keyed by login wallet address
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Merchant {
    /// Login identity (also the legacy payout fallback)
    pub wallet_address: String,

    #[serde(default)]
    pub pi_uid: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// Payout destination; distinct from the login identity
    #[serde(default)]
    pub payment_wallet_address: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Merchant {
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            pi_uid: None,
            username: None,
            payment_wallet_address: None,
            created_at: Utc::now(),
        }
    }

    /// Merge present fields only; absent fields keep their stored values
    pub fn merge(&mut self, update: MerchantUpdate) {
        if let Some(pi_uid) = update.pi_uid {
            self.pi_uid = Some(pi_uid);
        }
        if let Some(username) = update.username {
            self.username = Some(username);
        }
        if let Some(address) = update.payment_wallet_address {
            self.payment_wallet_address = Some(address);
        }
    }
}

/// Partial merchant upsert input
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MerchantUpdate {
    pub pi_uid: Option<String>,
    pub username: Option<String>,
    pub payment_wallet_address: Option<String>,
}

/// A simple catalog entry; no lifecycle beyond create/list
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub merchant_address: String,
    pub created_at: DateTime<Utc>,
}
