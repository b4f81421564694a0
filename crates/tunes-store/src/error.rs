//! Store Error Types

use thiserror::Error;
use tunes_core::OrderId;

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// No order with this id
    #[error("Order not found for ID: {0}")]
    OrderNotFound(OrderId),

    /// The supplied gateway order id is not the one stored on the order
    #[error("Gateway order mismatch for order {0}")]
    GatewayOrderMismatch(OrderId),

    /// The order was already settled by a different payment
    #[error("Order {order_id} already paid by {payment_id}")]
    AlreadyPaid { order_id: OrderId, payment_id: String },

    /// A stored row could not be mapped back to the domain
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Database(_))
    }

    /// Whether the error means the backend itself failed, as opposed to the request
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            StoreError::Database(_) | StoreError::Migration(_) | StoreError::Corrupt(_)
        )
    }
}
