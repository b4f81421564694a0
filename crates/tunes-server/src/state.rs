//! Application State

use std::sync::Arc;

use tunes_payments::PaymentGateway;
use tunes_store::OrderStore;

use crate::config::CheckoutSettings;
use crate::error::AppError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order, payment, user and contact persistence
    pub store: Arc<dyn OrderStore>,

    /// Payment gateway (optional - None if not configured)
    pub gateway: Option<Arc<dyn PaymentGateway>>,

    /// Currency and merchant details
    pub checkout: Arc<CheckoutSettings>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OrderStore>,
        gateway: Option<Arc<dyn PaymentGateway>>,
        checkout: CheckoutSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            checkout: Arc::new(checkout),
        }
    }

    /// The configured gateway, or `PaymentsDisabled`
    pub fn gateway(&self) -> Result<&Arc<dyn PaymentGateway>, AppError> {
        self.gateway.as_ref().ok_or(AppError::PaymentsDisabled)
    }
}
