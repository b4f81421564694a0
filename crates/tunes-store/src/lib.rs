//! # tunes-store
//!
//! Persistence for orders, payments, users and contact inquiries.
//!
//! Two backends implement [`OrderStore`]:
//!
//! - [`MySqlOrderStore`] - production backend on a sqlx `MySqlPool`
//! - [`MemoryOrderStore`] - in-process tables for development and tests
//!
//! ## Settlement
//!
//! Marking an order paid is the only multi-statement write. It runs as one
//! unit: the order update, the lazy user insert and the payment insert either
//! all land or none do.
//!
//! ```text
//! settle_payment
//!   ├─ order missing                      → StoreError::OrderNotFound
//!   ├─ gateway order id differs           → StoreError::GatewayOrderMismatch
//!   ├─ already Paid by this payment       → SettleOutcome::AlreadySettled
//!   ├─ already Paid by another payment    → StoreError::AlreadyPaid
//!   └─ Pending                            → update + user + payment → Settled
//! ```

mod error;
mod memory;
mod mysql;

pub use error::{Result, StoreError};
pub use memory::MemoryOrderStore;
pub use mysql::MySqlOrderStore;
pub use sqlx::mysql::MySqlConnectOptions;

use async_trait::async_trait;
use tunes_core::{ContactInquiry, NewContactInquiry, NewOrder, Order, OrderId, Payment, User};

/// A verified payment to be recorded against an order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub order_id: OrderId,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,

    /// Payment method reported by the gateway (`upi`, `card`, ...)
    pub method: String,
}

/// Result of a settlement attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The order moved to `Paid` in this call
    Settled(Order),

    /// The order was already paid by the same payment; nothing was written
    AlreadySettled(Order),
}

impl SettleOutcome {
    pub fn order(&self) -> &Order {
        match self {
            SettleOutcome::Settled(order) | SettleOutcome::AlreadySettled(order) => order,
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self, SettleOutcome::AlreadySettled(_))
    }
}

/// Storage for the order flow
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new `Pending` order
    async fn insert_order(&self, order: NewOrder) -> Result<Order>;

    /// Record the gateway order id created for a local order
    async fn attach_gateway_order(&self, id: OrderId, gateway_order_id: &str) -> Result<()>;

    /// Load an order by local id
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Mark an order paid, upsert its user and record the payment atomically
    async fn settle_payment(&self, settlement: &Settlement) -> Result<SettleOutcome>;

    /// Look up a user by email
    async fn get_user(&self, email: &str) -> Result<Option<User>>;

    /// Payments recorded against a gateway order
    async fn payments_for_gateway_order(&self, gateway_order_id: &str) -> Result<Vec<Payment>>;

    /// Store a contact form submission
    async fn insert_contact(&self, inquiry: NewContactInquiry) -> Result<ContactInquiry>;

    /// Check the backend is reachable
    async fn health_check(&self) -> bool;

    /// Backend name
    fn name(&self) -> &str;
}
