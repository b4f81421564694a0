//! Hosted Checkout
//!
//! Options handed to the gateway's checkout widget and the payloads it
//! reports back. Field names follow the widget's JSON contract.

use serde::{Deserialize, Serialize};
use tunes_core::OrderId;
use tunes_core::wire::{CreateOrderResponse, OrderIdInput, VerifyPaymentRequest};

/// Merchant presentation in the widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branding {
    pub merchant_name: String,
    pub currency: String,
    pub theme_color: String,
    pub image: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            merchant_name: "ForeverTunes".into(),
            currency: "INR".into(),
            theme_color: "#3399cc".into(),
            image: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    pub database_order_id: OrderId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub color: String,
}

/// Widget options for one gateway order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    /// Public gateway key
    pub key: String,

    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Gateway order id the payment is taken against
    pub order_id: String,
    pub prefill: Prefill,
    pub notes: Notes,
    pub theme: Theme,
}

impl CheckoutOptions {
    /// Options for a freshly created order
    pub fn for_order(order: &CreateOrderResponse, branding: &Branding) -> Self {
        Self {
            key: order.gateway_key_id.clone(),
            amount: order.amount,
            currency: branding.currency.clone(),
            name: branding.merchant_name.clone(),
            description: format!("Payment for {}", order.customer_name),
            image: branding.image.clone(),
            order_id: order.gateway_order_id.clone(),
            prefill: Prefill {
                name: order.customer_name.clone(),
                email: order.customer_email.clone(),
                contact: order.customer_mobile.clone(),
            },
            notes: Notes {
                database_order_id: order.order_id,
            },
            theme: Theme {
                color: branding.theme_color.clone(),
            },
        }
    }
}

/// Signed result passed to the widget's success handler
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

impl CheckoutResult {
    /// Body for `POST /verify-payment`
    pub fn to_verify_request(&self, order_id: OrderId) -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            gateway_payment_id: self.razorpay_payment_id.clone(),
            gateway_order_id: self.razorpay_order_id.clone(),
            gateway_signature: self.razorpay_signature.clone(),
            order_id: Some(OrderIdInput::from(order_id)),
        }
    }
}

/// `error` object of the widget's `payment.failed` event
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFailure {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reason: Option<String>,
}
