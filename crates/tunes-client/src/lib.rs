//! ForeverTunes Storefront Client
//!
//! The browser side of the checkout, without a DOM: an explicit
//! [`CheckoutFlow`] object owns the order draft and the current stage, and
//! the async drivers in [`driver`] move it through the two server calls.
//!
//! ```text
//! Home → PackageSelected → LanguageAndDescriptionEntered → PaymentSubmitted
//!                                                            ├→ PaymentSucceeded
//!                                                            └→ PaymentFailed
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let api = HttpOrderApi::new("https://forevertunes.example")?;
//! let mut flow = CheckoutFlow::new();
//! flow.choose_package(Package::premium());
//! flow.continue_to_payment("A birthday song for Mum");
//! flow.set_customer("Asha", "asha@example.com", "9876543210");
//!
//! let options = driver::submit_order(&mut flow, &api, &Branding::default()).await?;
//! // hand `options` to the hosted checkout widget, then:
//! let redirect = driver::complete_payment(&mut flow, &api, result).await?;
//! ```

pub mod api;
pub mod checkout;
pub mod contact;
pub mod draft;
pub mod driver;
pub mod error;
pub mod flow;

pub use api::{HttpOrderApi, OrderApi};
pub use checkout::{Branding, CheckoutFailure, CheckoutOptions, CheckoutResult};
pub use contact::ContactForm;
pub use draft::{OrderDraft, Package};
pub use error::{ClientError, Result};
pub use flow::{CheckoutFlow, Stage};
