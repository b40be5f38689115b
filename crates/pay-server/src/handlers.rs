//! Payment, Auth & Health Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use pay_core::{MerchantUpdate, Payment};
use pay_engine::CreatePaymentRequest;
use pay_platform::{PlatformError, PlatformGateway};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub pi_api_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    #[serde(default)]
    pub txid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthVerifyRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
        pi_api_configured: state.platform.is_some(),
    })
}

/// Create a pending payment record for a checkout link
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = state.orchestrator.create_payment(payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Server-side approval of a processor payment
pub async fn approve_payment(
    State(state): State<AppState>,
    Path(pi_payment_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let response = state.orchestrator.approve(&pi_payment_id).await?;
    Ok(Json(response.raw))
}

/// Server-side completion: chain check, processor finalize, side effects
pub async fn complete_payment(
    State(state): State<AppState>,
    Path(pi_payment_id): Path<String>,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<Value>, ApiError> {
    let txid = payload
        .txid
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Transaction ID (txid) required"))?;

    let outcome = state.orchestrator.complete(&pi_payment_id, txid).await?;
    Ok(Json(outcome.body))
}

/// Cancellation transition reported by the wallet client
pub async fn cancel_payment(
    State(state): State<AppState>,
    Path(pi_payment_id): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> Result<Json<Payment>, ApiError> {
    let reason = payload.reason.as_deref().unwrap_or("cancelled by payer");
    let payment = state.orchestrator.cancel(&pi_payment_id, reason).await?;
    Ok(Json(payment))
}

/// Processor-side payment status, proxied verbatim
pub async fn pi_payment_status(
    State(state): State<AppState>,
    Path(pi_payment_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let response = state.orchestrator.payment_status(&pi_payment_id).await?;
    Ok(Json(response.raw))
}

/// Local payment record by its locally generated id
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    state
        .store
        .payment(&payment_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Payment not found"))
}

/// Verify a wallet user's access token and upsert the merchant record
pub async fn auth_verify(
    State(state): State<AppState>,
    Json(payload): Json<AuthVerifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let access_token = payload
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Access token required"))?;

    let platform = state.platform.as_ref().ok_or_else(|| {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Pi API Key not configured")
    })?;

    let user = platform.me(access_token).await.map_err(|e| {
        let status = match &e {
            PlatformError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::UNAUTHORIZED)
            }
            _ => StatusCode::UNAUTHORIZED,
        };
        let mut api = ApiError::new(status, "Authentication failed");
        api.body.details = e.upstream_detail().cloned();
        api
    })?;

    // Non-critical side effect: remember the merchant. A store hiccup
    // must not fail a successful authentication.
    let wallet_address = user["uid"]
        .as_str()
        .map(str::to_string)
        .or_else(|| payload.uid.clone());
    if let Some(address) = wallet_address {
        let update = MerchantUpdate {
            pi_uid: user["uid"].as_str().map(str::to_string).or(payload.uid),
            username: user["username"]
                .as_str()
                .map(str::to_string)
                .or(payload.username),
            ..Default::default()
        };
        if let Err(e) = state.store.upsert_merchant(&address, update).await {
            tracing::warn!(wallet_address = %address, error = %e, "Failed to store merchant");
        }
    }

    Ok(Json(json!({ "verified": true, "user": user })))
}
