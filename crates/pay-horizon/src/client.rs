//! Horizon Query Client
//!
//! Thin read-only accessors over the Pi Network Horizon API. Every request
//! carries a bounded timeout; a timed-out call surfaces as a network error
//! and is always safe to retry.

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;

use crate::error::{HorizonError, Result};
use crate::types::{PageQuery, TransactionRecord};

/// Horizon client configuration
#[derive(Clone, Debug)]
pub struct HorizonConfig {
    /// Ledger API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mainnet.minepi.com".into(),
            timeout_secs: 10,
        }
    }
}

impl HorizonConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("HORIZON_API_BASE")
            .unwrap_or_else(|_| "https://api.mainnet.minepi.com".into());

        Self {
            base_url,
            ..Default::default()
        }
    }
}

/// Read-only ledger access (Strategy pattern)
///
/// Implemented by the real Horizon client and by the mock used in tests.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Account record by wallet address, proxied verbatim
    async fn account(&self, account_id: &str) -> Result<Value>;

    /// Transaction record by hash, with its batched operations
    async fn transaction(&self, hash: &str) -> Result<TransactionRecord>;

    /// Transactions touching an account (cursor pagination passthrough)
    async fn account_transactions(&self, account_id: &str, page: &PageQuery) -> Result<Value>;

    /// Payment operations received by an account
    async fn account_payments(&self, account_id: &str, page: &PageQuery) -> Result<Value>;

    /// Ledger root document; doubles as a liveness probe
    async fn network_info(&self) -> Result<Value>;

    /// Native-asset balance for an account.
    ///
    /// Defaults to 0 on any lookup or parse failure; a missing balance is
    /// never an error.
    async fn balance(&self, account_id: &str) -> Decimal {
        let account = match self.account(account_id).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(account_id = %account_id, error = %e, "Balance lookup failed");
                return Decimal::ZERO;
            }
        };

        account["balances"]
            .as_array()
            .and_then(|balances| {
                balances.iter().find(|b| {
                    b["asset_type"] == "native"
                        || (b["asset_code"] == "PI" && b["asset_issuer"] == "")
                })
            })
            .and_then(|b| b["balance"].as_str())
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether an account exists on the ledger.
    ///
    /// `Ok(false)` only on a definitive not-found; transport and service
    /// failures stay errors so callers can decide to fail open.
    async fn account_exists(&self, account_id: &str) -> Result<bool> {
        match self.account(account_id).await {
            Ok(_) => Ok(true),
            Err(HorizonError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// reqwest-backed Horizon client
pub struct HorizonClient {
    http: reqwest::Client,
    config: HorizonConfig,
}

impl HorizonClient {
    pub fn new(config: HorizonConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    pub fn from_env() -> Self {
        Self::new(HorizonConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// GET a Horizon resource, normalizing 404 and non-success statuses
    async fn get_json(
        &self,
        url: String,
        params: &[(&'static str, String)],
        what: &'static str,
    ) -> Result<Value> {
        let response = self.http.get(&url).query(params).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(HorizonError::NotFound(what));
        }
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(HorizonError::Fetch {
                what,
                detail: format!("{status}: {detail}"),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl LedgerClient for HorizonClient {
    async fn account(&self, account_id: &str) -> Result<Value> {
        let url = format!("{}/accounts/{account_id}", self.config.base_url);
        self.get_json(url, &[], "Account").await
    }

    async fn transaction(&self, hash: &str) -> Result<TransactionRecord> {
        let url = format!("{}/transactions/{hash}", self.config.base_url);
        let raw = self.get_json(url, &[], "Transaction").await?;
        serde_json::from_value(raw).map_err(|e| HorizonError::Fetch {
            what: "Transaction",
            detail: e.to_string(),
        })
    }

    async fn account_transactions(&self, account_id: &str, page: &PageQuery) -> Result<Value> {
        let url = format!("{}/accounts/{account_id}/transactions", self.config.base_url);
        self.get_json(url, &page.to_params(), "Transactions").await
    }

    async fn account_payments(&self, account_id: &str, page: &PageQuery) -> Result<Value> {
        // Horizon filters received payments with the `to` parameter
        let url = format!("{}/payments", self.config.base_url);
        let mut params = page.to_params();
        params.push(("to", account_id.to_string()));
        self.get_json(url, &params, "Payments").await
    }

    async fn network_info(&self) -> Result<Value> {
        self.get_json(self.config.base_url.clone(), &[], "Network info")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HorizonConfig::default();
        assert_eq!(config.base_url, "https://api.mainnet.minepi.com");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_page_query_params() {
        let page = PageQuery {
            limit: Some(10),
            cursor: Some("12345".into()),
            order: None,
        };
        let params = page.to_params();
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("limit", "10".to_string())));
        assert!(params.contains(&("cursor", "12345".to_string())));
    }
}
