//! Gateway Abstraction
//!
//! Strategy trait over the payment provider so the server can run against
//! Razorpay in production and a mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};

/// Request to create a gateway order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    /// Amount in minor units (paise)
    pub amount: i64,

    /// ISO currency code
    pub currency: String,

    /// Merchant receipt label (`order_rcpt_<local id>`)
    pub receipt: String,

    /// Capture automatically on authorization (1) or not (0)
    pub payment_capture: u8,

    /// Free-form notes attached to the order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<serde_json::Value>,
}

impl GatewayOrderRequest {
    /// Auto-captured order request
    pub fn new(amount: i64, currency: impl Into<String>, receipt: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            receipt: receipt.into(),
            payment_capture: 1,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: serde_json::Value) -> Self {
        self.notes = Some(notes);
        self
    }
}

/// Order as created on the gateway
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

/// Payment as reported by the gateway
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPayment {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

impl GatewayPayment {
    pub fn is_captured(&self) -> bool {
        self.status.eq_ignore_ascii_case("captured")
    }

    /// Check this payment settles `gateway_order_id` for exactly `expected_amount`
    pub fn ensure_settles(&self, gateway_order_id: &str, expected_amount: i64) -> Result<()> {
        if !self.is_captured() {
            return Err(PaymentError::NotCaptured(self.status.clone()));
        }
        if self.order_id.as_deref() != Some(gateway_order_id) {
            return Err(PaymentError::OrderMismatch {
                payment_id: self.id.clone(),
                order_id: gateway_order_id.to_owned(),
            });
        }
        if self.amount != expected_amount {
            return Err(PaymentError::AmountMismatch {
                expected: expected_amount,
                actual: self.amount,
            });
        }
        Ok(())
    }

    /// Payment method, defaulting to the gateway name when not reported
    pub fn method_or(&self, fallback: &str) -> String {
        self.method.clone().unwrap_or_else(|| fallback.to_owned())
    }
}

/// Signed checkout result handed back by the browser
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSignature {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// Payment gateway trait (Strategy pattern)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a remote order the customer can pay against
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder>;

    /// Fetch a payment's current state
    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment>;

    /// Verify a checkout signature against the merchant secret
    fn verify_signature(&self, signature: &PaymentSignature) -> Result<()>;

    /// Public key id handed to the browser checkout
    fn key_id(&self) -> &str;

    /// Gateway name
    fn name(&self) -> &str;
}
