//! Mock Ledger Client
//!
//! For testing and demo purposes. Serves scripted accounts and
//! transactions, or fails every call to simulate a ledger outage.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::LedgerClient;
use crate::error::{HorizonError, Result};
use crate::types::{Operation, PageQuery, TransactionRecord};

/// Scripted in-memory ledger
#[derive(Default)]
pub struct MockLedgerClient {
    accounts: HashMap<String, Value>,
    transactions: HashMap<String, TransactionRecord>,
    failing: bool,
}

impl MockLedgerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every call errors, as if the service were down
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Register an account with the given native balance
    #[must_use]
    pub fn with_account(mut self, account_id: &str, balance: &str) -> Self {
        self.accounts.insert(
            account_id.to_string(),
            json!({
                "id": account_id,
                "account_id": account_id,
                "balances": [
                    { "asset_type": "native", "balance": balance }
                ]
            }),
        );
        self
    }

    /// Register a transaction record
    #[must_use]
    pub fn with_transaction(mut self, transaction: TransactionRecord) -> Self {
        self.transactions
            .insert(transaction.hash.clone(), transaction);
        self
    }

    /// A successful-or-not transaction carrying one payment operation
    pub fn payment_tx(
        hash: &str,
        destination: &str,
        amount: &str,
        successful: bool,
    ) -> TransactionRecord {
        TransactionRecord {
            hash: hash.to_string(),
            successful,
            ledger: Some(1),
            created_at: Some("2024-01-01T00:00:00Z".into()),
            operations: vec![Operation {
                op_type: "payment".into(),
                type_i: Some(1),
                to: Some(destination.to_string()),
                amount: Some(amount.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn check_available(&self, what: &'static str) -> Result<()> {
        if self.failing {
            return Err(HorizonError::Fetch {
                what,
                detail: "ledger service unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn account(&self, account_id: &str) -> Result<Value> {
        self.check_available("Account")?;
        self.accounts
            .get(account_id)
            .cloned()
            .ok_or(HorizonError::NotFound("Account"))
    }

    async fn transaction(&self, hash: &str) -> Result<TransactionRecord> {
        self.check_available("Transaction")?;
        self.transactions
            .get(hash)
            .cloned()
            .ok_or(HorizonError::NotFound("Transaction"))
    }

    async fn account_transactions(&self, account_id: &str, _page: &PageQuery) -> Result<Value> {
        self.check_available("Transactions")?;
        let records: Vec<&TransactionRecord> = self
            .transactions
            .values()
            .filter(|tx| {
                tx.operations
                    .iter()
                    .any(|op| op.recipient() == Some(account_id))
            })
            .collect();
        Ok(json!({ "_embedded": { "records": records } }))
    }

    async fn account_payments(&self, account_id: &str, page: &PageQuery) -> Result<Value> {
        self.account_transactions(account_id, page).await
    }

    async fn network_info(&self) -> Result<Value> {
        self.check_available("Network info")?;
        Ok(json!({ "horizon_version": "mock", "network_passphrase": "Pi Testnet" }))
    }
}
