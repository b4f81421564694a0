//! ForeverTunes HTTP Server
//!
//! Axum application serving the order, payment-verification, receipt and
//! contact endpoints. The binary in `main.rs` wires configuration, the
//! store backend and the gateway into [`AppState`] and serves [`app`].
//!
//! ```text
//! POST /create-order      → JSON  (order + gateway order)
//! POST /verify-payment    → JSON  (settle, redirect url)
//! GET  /payment-success   → HTML
//! GET  /download-receipt  → HTML attachment
//! POST /contact           → JSON
//! GET  /health            → JSON
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod service;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tunes_core::wire::{DOWNLOAD_RECEIPT_PATH, PAYMENT_SUCCESS_PATH};

pub use config::{AppConfig, CheckoutSettings, DatabaseTarget, StoreBackend};
pub use error::AppError;
pub use state::AppState;

use crate::handlers::{
    contact, create_order, download_receipt, health_check, payment_success, verify_payment,
};

/// Build the router
///
/// When `static_dir` is given, unmatched paths are served from it (the
/// marketing site and checkout page).
pub fn app(state: AppState, static_dir: Option<&str>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Health
        .route("/health", get(health_check))
        // Checkout
        .route("/create-order", post(create_order))
        .route("/verify-payment", post(verify_payment))
        .route(PAYMENT_SUCCESS_PATH, get(payment_success))
        .route(DOWNLOAD_RECEIPT_PATH, get(download_receipt))
        // Contact
        .route("/contact", post(contact));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
