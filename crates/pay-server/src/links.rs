//! Checkout Link & Product Handlers
//!
//! Persistence glue around the record store. Request coercion mirrors the
//! merchant dashboard's loose inputs: garbage stock counts collapse to 0,
//! while a paid link's amount must actually parse.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use pay_core::{CheckoutLink, LinkUpdate, NewLink, Payment, PaymentType, Product, Question};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MerchantQuery {
    #[serde(default)]
    pub merchant: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub merchant_address: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub stock: Option<Value>,
    #[serde(default)]
    pub redirect_url: String,
    #[serde(default)]
    pub internal_name: String,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
    #[serde(default)]
    pub waitlist_enabled: Option<bool>,
    #[serde(default)]
    pub auto_expire_days: Option<u32>,
    #[serde(default)]
    pub free_trial_days: Option<u32>,
    #[serde(default)]
    pub initial_fee: Option<Value>,
    #[serde(default)]
    pub split_pay_installments: Option<Value>,
    #[serde(default)]
    pub cancellation_discount_percent: Option<Value>,
    #[serde(default)]
    pub cancellation_discount_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub merchant_address: String,
}

/// Number-or-string decimal; `None` when absent, `Err(())` when present
/// but unparseable
pub(crate) fn coerce_decimal(value: &Option<Value>) -> Result<Option<Decimal>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.to_string().parse().map(Some).map_err(|_| ()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse().map(Some).map_err(|_| ())
        }
        Some(_) => Err(()),
    }
}

/// Loose integer coercion: anything that does not parse collapses to 0
fn coerce_count(value: &Option<Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Create a checkout link
pub async fn create_link(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<CheckoutLink>, ApiError> {
    let Some(payment_type) = payload.payment_type.as_deref().and_then(PaymentType::parse)
    else {
        return Err(ApiError::bad_request(
            "Valid payment type is required (Free, One-time, or Recurring)",
        ));
    };

    let amount = coerce_decimal(&payload.amount).unwrap_or(None);
    if payment_type.is_paid() && (amount.is_none() || amount.is_some_and(|a| a < Decimal::ZERO)) {
        return Err(ApiError::bad_request(
            "Valid amount greater than or equal to 0 is required for paid payment types",
        ));
    }

    let link = CheckoutLink::create(NewLink {
        merchant_address: payload.merchant_address,
        product_name: payload.product_name,
        description: payload.description,
        amount: amount.unwrap_or(Decimal::ZERO),
        payment_type: Some(payment_type),
        stock: coerce_count(&payload.stock),
        redirect_url: payload.redirect_url,
        internal_name: payload.internal_name,
        questions: payload.questions.unwrap_or_default(),
        waitlist_enabled: payload.waitlist_enabled.unwrap_or(false),
        auto_expire_days: payload.auto_expire_days,
        free_trial_days: payload.free_trial_days,
        initial_fee: coerce_decimal(&payload.initial_fee)
            .unwrap_or(None)
            .unwrap_or(Decimal::ZERO),
        split_pay_installments: coerce_count(&payload.split_pay_installments),
        cancellation_discount_percent: coerce_decimal(&payload.cancellation_discount_percent)
            .unwrap_or(None)
            .unwrap_or(Decimal::ZERO),
        cancellation_discount_type: payload.cancellation_discount_type,
    })?;

    state.store.insert_link(link.clone()).await?;

    tracing::info!(
        link_id = %link.link_id,
        merchant_address = %link.merchant_address,
        payment_type = %link.payment_type,
        "Created checkout link"
    );

    Ok(Json(link))
}

/// Checkout link by id
pub async fn get_link(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
) -> Result<Json<CheckoutLink>, ApiError> {
    state
        .store
        .link(&link_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Checkout link not found"))
}

/// All checkout links for a merchant, newest first
pub async fn list_links(
    State(state): State<AppState>,
    Query(query): Query<MerchantQuery>,
) -> Result<Json<Vec<CheckoutLink>>, ApiError> {
    let merchant = query
        .merchant
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::bad_request("Merchant address required"))?;

    Ok(Json(state.store.links_for_merchant(merchant).await?))
}

/// Merge a partial update into a checkout link
pub async fn update_link(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
    Json(update): Json<LinkUpdate>,
) -> Result<Json<Value>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }

    if !state.store.update_link(&link_id, update).await? {
        return Err(ApiError::not_found("Checkout link not found"));
    }

    Ok(Json(json!({ "message": "Updated successfully" })))
}

/// Payments recorded against a checkout link, newest first
pub async fn link_payments(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(state.store.payments_for_link(&link_id).await?))
}

/// All products for a merchant, newest first
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<MerchantQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let merchant = query
        .merchant
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::bad_request("Merchant address required"))?;

    Ok(Json(state.store.products_for_merchant(merchant).await?))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Product name is required"));
    }
    let merchant_address = payload.merchant_address.trim();
    if merchant_address.is_empty() {
        return Err(ApiError::bad_request("Merchant address is required"));
    }

    let product = state
        .store
        .insert_product(name, payload.description.trim(), merchant_address)
        .await?;

    Ok(Json(product))
}
