//! quantum-pay HTTP Server
//!
//! Axum-based backend for the Pi Network checkout-link platform: link and
//! product CRUD, the payment reconciliation endpoints, ledger passthrough,
//! and merchant payout wallet management.

mod error;
mod handlers;
mod horizon;
mod links;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pay_core::{MemoryStore, RecordStore};
use pay_engine::{EngineConfig, PaymentOrchestrator, WalletRegistry};
use pay_horizon::{HorizonClient, LedgerClient, PaymentVerifier};
use pay_platform::{PiPlatformClient, PlatformGateway};

use crate::handlers::{
    approve_payment, auth_verify, cancel_payment, complete_payment, create_payment, get_payment,
    health_check, pi_payment_status,
};
use crate::horizon::{
    account, account_balance, account_payments, account_transactions, get_merchant, network_info,
    set_merchant_wallet, transaction, verify_transaction,
};
use crate::links::{
    create_link, create_product, get_link, link_payments, list_links, list_products, update_link,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Storage and ledger access
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let ledger: Arc<dyn LedgerClient> = Arc::new(HorizonClient::from_env());
    let verifier = PaymentVerifier::new(ledger.clone());

    // Probe the ledger service
    match ledger.network_info().await {
        Ok(_) => tracing::info!("✓ Connected to Horizon"),
        Err(e) => {
            tracing::warn!("⚠ Horizon not reachable: {}", e);
            tracing::warn!("  On-chain verification will report failures until it recovers");
        }
    }

    // Pi Platform client (optional - None if not configured)
    let platform = PiPlatformClient::from_env().ok().map(Arc::new);
    if platform.is_some() {
        tracing::info!("✓ Pi Platform API configured");
    } else {
        tracing::warn!("⚠ PI_API_KEY not set - payment approval/completion disabled");
        tracing::warn!("  Set PI_API_KEY in .env to enable payment processing");
    }

    let gateway: Option<Arc<dyn PlatformGateway>> = platform
        .clone()
        .map(|p| p as Arc<dyn PlatformGateway>);

    let engine_config = EngineConfig::from_env();
    if engine_config.strict_chain_verification {
        tracing::info!("Strict chain verification enabled: unverified completions are blocked");
    }

    let orchestrator = Arc::new(PaymentOrchestrator::new(
        store.clone(),
        gateway,
        verifier.clone(),
        engine_config,
    ));
    let wallets = Arc::new(WalletRegistry::new(store.clone(), ledger.clone()));

    // Build application state
    let state = AppState {
        store,
        ledger,
        verifier,
        platform,
        orchestrator,
        wallets,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health
        .route("/api/health", get(health_check))
        // Products
        .route("/api/products", get(list_products).post(create_product))
        // Checkout links
        .route("/api/checkout-links", get(list_links).post(create_link))
        .route(
            "/api/checkout-links/{link_id}",
            get(get_link).put(update_link),
        )
        .route("/api/checkout-links/{link_id}/payments", get(link_payments))
        // Payments
        .route("/api/payments", post(create_payment))
        .route("/api/payments/{payment_id}", get(get_payment))
        .route("/api/payments/{payment_id}/approve", post(approve_payment))
        .route("/api/payments/{payment_id}/complete", post(complete_payment))
        .route("/api/payments/{payment_id}/cancel", post(cancel_payment))
        .route("/api/payments/pi/{payment_id}", get(pi_payment_status))
        // Auth
        .route("/api/auth/verify", post(auth_verify))
        // Merchants
        .route("/api/merchants/{address}", get(get_merchant))
        .route("/api/merchants/{address}/wallet", put(set_merchant_wallet))
        // Ledger passthrough
        .route("/api/horizon/verify-transaction", post(verify_transaction))
        .route("/api/horizon/account/{account_id}", get(account))
        .route(
            "/api/horizon/account/{account_id}/balance",
            get(account_balance),
        )
        .route(
            "/api/horizon/account/{account_id}/transactions",
            get(account_transactions),
        )
        .route(
            "/api/horizon/account/{account_id}/payments",
            get(account_payments),
        )
        .route("/api/horizon/transaction/{txid}", get(transaction))
        .route("/api/horizon/network", get(network_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 quantum-pay server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health                        - Health check");
    tracing::info!("  POST /api/checkout-links                - Create checkout link");
    tracing::info!("  POST /api/payments                      - Create pending payment");
    tracing::info!("  POST /api/payments/:id/approve          - Server-side approval");
    tracing::info!("  POST /api/payments/:id/complete         - Server-side completion");
    tracing::info!("  POST /api/horizon/verify-transaction    - Verify on-chain payment");
    tracing::info!("  PUT  /api/merchants/:address/wallet     - Set payout wallet");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
