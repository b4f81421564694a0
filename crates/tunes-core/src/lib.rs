//! # tunes-core
//!
//! Domain types shared by the ForeverTunes server and client.
//!
//! ## Order lifecycle
//!
//! ```text
//! ┌──────────────┐   create-order   ┌───────────┐   verify-payment   ┌────────┐
//! │ Client draft │ ───────────────▶ │  Pending  │ ─────────────────▶ │  Paid  │
//! └──────────────┘                  └───────────┘  (valid signature) └────────┘
//! ```
//!
//! An order only ever moves `Pending -> Paid`, exactly once, and only after the
//! gateway signature over `<gateway order id>|<gateway payment id>` checks out.
//!
//! The crate holds no I/O: persistence lives in `tunes-store`, gateway calls in
//! `tunes-payments`.

pub mod error;
pub mod intake;
pub mod model;
pub mod pricing;
pub mod receipt;
pub mod wire;

pub use error::{CoreError, Result};
pub use intake::{ContactIntake, OrderIntake};
pub use model::{
    ContactInquiry, NewContactInquiry, NewOrder, Order, OrderId, OrderStatus, Payment,
    PaymentStatus, User,
};
pub use pricing::{format_amount, parse_price, to_minor_units};
