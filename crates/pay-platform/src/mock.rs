//! Mock Platform Gateway
//!
//! For testing the reconciliation flow without the real processor.
//! Records every approve/complete call and serves scripted outcomes.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::{GatewayPayment, PlatformGateway};
use crate::error::{PlatformError, Result};

/// Scripted processor double
pub struct MockGateway {
    /// Whether `complete` confirms `developer_completed`
    confirm_completion: bool,

    /// When set, approve/complete fail with this upstream status
    fail_status: Option<u16>,

    approve_calls: Mutex<Vec<String>>,
    complete_calls: Mutex<Vec<(String, String)>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// A gateway that approves and confirms completions
    pub fn new() -> Self {
        Self {
            confirm_completion: true,
            fail_status: None,
            approve_calls: Mutex::new(Vec::new()),
            complete_calls: Mutex::new(Vec::new()),
        }
    }

    /// A gateway that accepts completion calls but does not confirm them
    /// (payment stays pending processor-side)
    pub fn withholding_completion() -> Self {
        Self {
            confirm_completion: false,
            ..Self::new()
        }
    }

    /// A gateway whose approve/complete calls fail with the given status
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::new()
        }
    }

    pub fn approve_calls(&self) -> Vec<String> {
        self.approve_calls.lock().unwrap().clone()
    }

    pub fn complete_calls(&self) -> Vec<(String, String)> {
        self.complete_calls.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        if let Some(status) = self.fail_status {
            return Err(PlatformError::Api {
                status,
                detail: json!({ "error": "scripted processor failure" }),
            });
        }
        Ok(())
    }

    fn payment_body(&self, pi_payment_id: &str, approved: bool, completed: bool) -> GatewayPayment {
        GatewayPayment {
            raw: json!({
                "identifier": pi_payment_id,
                "status": {
                    "developer_approved": approved,
                    "developer_completed": completed,
                    "cancelled": false,
                    "user_cancelled": false,
                }
            }),
        }
    }
}

#[async_trait]
impl PlatformGateway for MockGateway {
    async fn approve(&self, pi_payment_id: &str) -> Result<GatewayPayment> {
        self.check_failure()?;
        self.approve_calls
            .lock()
            .unwrap()
            .push(pi_payment_id.to_string());
        Ok(self.payment_body(pi_payment_id, true, false))
    }

    async fn complete(&self, pi_payment_id: &str, txid: &str) -> Result<GatewayPayment> {
        self.check_failure()?;
        self.complete_calls
            .lock()
            .unwrap()
            .push((pi_payment_id.to_string(), txid.to_string()));
        Ok(self.payment_body(pi_payment_id, true, self.confirm_completion))
    }

    async fn payment(&self, pi_payment_id: &str) -> Result<GatewayPayment> {
        self.check_failure()?;
        let completed = self
            .complete_calls
            .lock()
            .unwrap()
            .iter()
            .any(|(id, _)| id == pi_payment_id);
        Ok(self.payment_body(pi_payment_id, true, completed && self.confirm_completion))
    }

    async fn me(&self, _access_token: &str) -> Result<Value> {
        self.check_failure()?;
        Ok(json!({ "uid": "mock_uid", "username": "mock_user" }))
    }
}
