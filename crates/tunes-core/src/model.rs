//! Domain Model
//!
//! Orders, payments, users and contact inquiries as they are persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::pricing;

/// Local order identifier (auto-increment key of the `orders` table)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parse a positive id from user-supplied text
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<i64>().ok().filter(|id| *id > 0).map(Self)
    }

    /// Receipt label sent to the gateway when its order is created
    pub fn receipt_label(self) -> String {
        format!("order_rcpt_{}", self.0)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order status
///
/// The only legal transition is `Pending -> Paid`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Pending" | "pending" => Ok(OrderStatus::Pending),
            "Paid" | "paid" => Ok(OrderStatus::Paid),
            other => Err(CoreError::Invalid(format!("Unknown order status: {other}"))),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields needed to insert a new `Pending` order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_mobile: String,
    pub song_language: String,
    pub song_description: String,
    pub package_name: String,
    /// Price in major currency units (rupees)
    pub package_price: Decimal,
}

/// A persisted order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_mobile: String,
    pub song_language: String,
    pub song_description: String,
    pub package_name: String,
    pub package_price: Decimal,

    /// Set once the gateway order has been created
    pub gateway_order_id: Option<String>,

    /// Set when the order is marked paid
    pub gateway_payment_id: Option<String>,

    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Materialize a freshly inserted order
    pub fn from_new(id: OrderId, new: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_name: new.customer_name,
            customer_email: new.customer_email,
            customer_mobile: new.customer_mobile,
            song_language: new.song_language,
            song_description: new.song_description,
            package_name: new.package_name,
            package_price: new.package_price,
            gateway_order_id: None,
            gateway_payment_id: None,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }

    /// Amount in the gateway's minor unit (paise)
    pub fn amount_minor(&self) -> Result<i64> {
        pricing::to_minor_units(self.package_price)
    }

    /// Whether `payment_id` is the payment this order was settled with
    pub fn is_settled_by(&self, payment_id: &str) -> bool {
        self.is_paid() && self.gateway_payment_id.as_deref() == Some(payment_id)
    }
}

/// Payment status as recorded locally
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Captured,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Captured => "Captured",
        }
    }
}

/// A captured payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    pub gateway_order_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

/// A customer, created lazily on first successful payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new contact inquiry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewContactInquiry {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub message: String,
}

/// A stored contact inquiry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInquiry {
    pub id: i64,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
