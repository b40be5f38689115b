//! Pi Platform API Client
//!
//! Wraps the processor's payment endpoints: approve (server attests it
//! recognizes the pending payment), complete (server finalizes against a
//! transaction hash), status fetch, and user-token verification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::{PlatformError, Result};

/// Platform client configuration
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    /// Processor API base URL
    pub base_url: String,

    /// Server API key; authenticates approve/complete calls
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlatformConfig {
    /// Create from environment variables.
    ///
    /// Errors when `PI_API_KEY` is unset; the server keeps running with
    /// payment endpoints disabled in that case.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PI_API_KEY")
            .map_err(|_| PlatformError::Config("PI_API_KEY not set".into()))?;
        let base_url =
            std::env::var("PI_API_BASE").unwrap_or_else(|_| "https://api.minepi.com/v2".into());

        Ok(Self {
            base_url,
            api_key,
            timeout_secs: 30,
        })
    }
}

/// A processor payment object.
///
/// Keeps the raw body for verbatim proxying; the developer flags the
/// orchestrator needs are parsed out of the nested `status` object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayPayment {
    pub raw: Value,
}

impl GatewayPayment {
    pub fn identifier(&self) -> Option<&str> {
        self.raw["identifier"].as_str()
    }

    pub fn developer_approved(&self) -> bool {
        self.raw["status"]["developer_approved"]
            .as_bool()
            .unwrap_or(false)
    }

    pub fn developer_completed(&self) -> bool {
        self.raw["status"]["developer_completed"]
            .as_bool()
            .unwrap_or(false)
    }
}

/// Payment processor seam (Strategy pattern)
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Server-side approval of a pending payment intent. Re-approval is
    /// observably a no-op on the processor side.
    async fn approve(&self, pi_payment_id: &str) -> Result<GatewayPayment>;

    /// Server-side completion against an on-chain transaction hash
    async fn complete(&self, pi_payment_id: &str, txid: &str) -> Result<GatewayPayment>;

    /// Current processor-side payment object
    async fn payment(&self, pi_payment_id: &str) -> Result<GatewayPayment>;

    /// Resolve a wallet user's access token to their profile (`/me`)
    async fn me(&self, access_token: &str) -> Result<Value>;
}

/// reqwest-backed Pi Platform client
pub struct PiPlatformClient {
    http: reqwest::Client,
    config: PlatformConfig,
}

impl PiPlatformClient {
    pub fn new(config: PlatformConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(PlatformConfig::from_env()?))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Normalize a processor response: non-2xx becomes `Api` with the raw
    /// upstream body as detail
    async fn read_payment(&self, response: reqwest::Response) -> Result<GatewayPayment> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(PlatformError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let raw = response.json().await?;
        Ok(GatewayPayment { raw })
    }
}

#[async_trait]
impl PlatformGateway for PiPlatformClient {
    async fn approve(&self, pi_payment_id: &str) -> Result<GatewayPayment> {
        let url = format!("{}/payments/{pi_payment_id}/approve", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .json(&json!({}))
            .send()
            .await?;

        self.read_payment(response).await
    }

    async fn complete(&self, pi_payment_id: &str, txid: &str) -> Result<GatewayPayment> {
        let url = format!("{}/payments/{pi_payment_id}/complete", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .json(&json!({ "txid": txid }))
            .send()
            .await?;

        self.read_payment(response).await
    }

    async fn payment(&self, pi_payment_id: &str) -> Result<GatewayPayment> {
        let url = format!("{}/payments/{pi_payment_id}", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .send()
            .await?;

        self.read_payment(response).await
    }

    async fn me(&self, access_token: &str) -> Result<Value> {
        let url = format!("{}/me", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await?;

        let payment = self.read_payment(response).await?;
        Ok(payment.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_developer_flags_parsed_from_status() {
        let payment = GatewayPayment {
            raw: json!({
                "identifier": "pi_1",
                "status": { "developer_approved": true, "developer_completed": false }
            }),
        };
        assert_eq!(payment.identifier(), Some("pi_1"));
        assert!(payment.developer_approved());
        assert!(!payment.developer_completed());
    }

    #[test]
    fn test_missing_status_defaults_false() {
        let payment = GatewayPayment { raw: json!({}) };
        assert!(!payment.developer_approved());
        assert!(!payment.developer_completed());
    }

    #[test]
    fn test_config_error_has_no_upstream_status() {
        let err = PlatformError::Config("PI_API_KEY not set".into());
        assert_eq!(err.upstream_status(), None);

        let api = PlatformError::Api {
            status: 402,
            detail: json!({ "error": "insufficient funds" }),
        };
        assert_eq!(api.upstream_status(), Some(402));
    }

    #[test]
    fn test_gateway_payment_round_trips_raw_body() {
        let raw = json!({ "identifier": "pi_1", "amount": 3.5, "extra": [1, 2] });
        let payment = GatewayPayment { raw: raw.clone() };
        assert_eq!(serde_json::to_value(&payment).unwrap(), raw);
    }
}
