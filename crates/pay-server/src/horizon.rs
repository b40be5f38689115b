//! Ledger Passthrough & Merchant Wallet Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use pay_core::Merchant;
use pay_horizon::{PageQuery, TransactionRecord, VerificationResult};

use crate::error::ApiError;
use crate::links::coerce_decimal;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyTransactionRequest {
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SetWalletRequest {
    #[serde(default)]
    pub payment_wallet_address: Option<String>,
}

/// Verify a transaction hash against an expected recipient and amount.
///
/// Always an HTTP success: an unverified outcome is a reported result,
/// not a fault.
pub async fn verify_transaction(
    State(state): State<AppState>,
    Json(payload): Json<VerifyTransactionRequest>,
) -> Result<Json<VerificationResult>, ApiError> {
    let txid = payload
        .txid
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Transaction ID (txid) required"))?;
    let recipient = payload
        .recipient
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::bad_request("Recipient address required"))?;
    let amount = coerce_decimal(&payload.amount)
        .map_err(|()| ApiError::bad_request("Amount must be a number"))?;

    let result = state.verifier.verify(txid, recipient, amount).await;
    Ok(Json(result))
}

/// Ledger account record, proxied verbatim
pub async fn account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.ledger.account(&account_id).await?))
}

/// Native-asset balance; 0 for anything that cannot be read
pub async fn account_balance(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Json<Value> {
    let balance = state.ledger.balance(&account_id).await;
    Json(json!({ "account_id": account_id, "balance": balance }))
}

/// Transactions touching an account (cursor pagination passthrough)
pub async fn account_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(
        state.ledger.account_transactions(&account_id, &page).await?,
    ))
}

/// Payment operations received by an account
pub async fn account_payments(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(
        state.ledger.account_payments(&account_id, &page).await?,
    ))
}

/// Transaction record by hash
pub async fn transaction(
    State(state): State<AppState>,
    Path(txid): Path<String>,
) -> Result<Json<TransactionRecord>, ApiError> {
    Ok(Json(state.ledger.transaction(&txid).await?))
}

/// Ledger root document; liveness probe
pub async fn network_info(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.ledger.network_info().await?))
}

/// Validate and persist a merchant's payout wallet
pub async fn set_merchant_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(payload): Json<SetWalletRequest>,
) -> Result<Json<Merchant>, ApiError> {
    let payout = payload
        .payment_wallet_address
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Payment wallet address is required"))?;

    let merchant = state.wallets.set_payout_wallet(&address, payout).await?;
    Ok(Json(merchant))
}

/// Merchant record by login address
pub async fn get_merchant(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Merchant>, ApiError> {
    state
        .store
        .merchant(&address)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Merchant not found"))
}
