//! ForeverTunes HTTP Server binary
//!
//! Loads `.env`, picks the store backend, connects the payment gateway when
//! credentials are present and serves the router.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunes_payments::{PaymentGateway, RazorpayClient};
use tunes_server::{AppConfig, AppState, StoreBackend, app};
use tunes_store::{MemoryOrderStore, MySqlOrderStore, OrderStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    // Initialize store
    let store: Arc<dyn OrderStore> = match &config.store {
        StoreBackend::MySql(target) => {
            let store = MySqlOrderStore::connect(target.connect_options()?).await?;
            if config.run_migrations {
                store.migrate().await?;
                tracing::info!("✓ Database migrations applied");
            }
            tracing::info!("✓ Connected to MySQL");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("⚠ Using in-memory store - orders are lost on restart");
            Arc::new(MemoryOrderStore::new())
        }
    };

    // Initialize payments
    let gateway: Option<Arc<dyn PaymentGateway>> = match RazorpayClient::from_env() {
        Ok(client) => {
            tracing::info!(key_id = %client.config().key_id, "✓ Razorpay configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Razorpay not configured - payments disabled ({e})");
            tracing::warn!("  Set RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET in .env");
            None
        }
    };

    let state = AppState::new(store, gateway, config.checkout.clone());
    let router = app(state, Some(&config.static_dir));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🎵 ForeverTunes server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health            - Health check");
    tracing::info!("  POST /create-order      - Create order");
    tracing::info!("  POST /verify-payment    - Verify payment");
    tracing::info!("  GET  /payment-success   - Success page");
    tracing::info!("  GET  /download-receipt  - Receipt download");
    tracing::info!("  POST /contact           - Contact form");

    axum::serve(listener, router).await?;

    Ok(())
}
