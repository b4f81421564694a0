//! # tunes-payments
//!
//! Payment gateway integration for ForeverTunes (Razorpay).
//!
//! ## Checkout flow
//!
//! ```text
//! ┌──────────┐  create order   ┌──────────┐  hosted checkout  ┌──────────┐
//! │  Server  │ ──────────────▶ │ Gateway  │ ◀───────────────▶ │ Customer │
//! └──────────┘                 └──────────┘                   └──────────┘
//!      ▲                                                           │
//!      │        {payment id, order id, signature} via client       │
//!      └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The gateway signs every completed checkout with
//! `hex(HMAC-SHA256(key_secret, "<order id>|<payment id>"))`. The server checks
//! that signature before touching the store, then re-fetches the payment to
//! confirm it was captured for the expected order and amount.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tunes_payments::{PaymentGateway, RazorpayClient, GatewayOrderRequest};
//!
//! let gateway = RazorpayClient::from_env()?;
//! let order = gateway.create_order(&GatewayOrderRequest::new(99_900, "INR", "order_rcpt_1")).await?;
//! // hand order.id and gateway.key_id() to the browser checkout
//! ```

mod error;
mod gateway;
mod mock;
mod razorpay;
pub mod signature;

pub use error::{PaymentError, Result};
pub use gateway::{GatewayOrder, GatewayOrderRequest, GatewayPayment, PaymentGateway, PaymentSignature};
pub use mock::MockGateway;
pub use razorpay::{RazorpayClient, RazorpayConfig};
