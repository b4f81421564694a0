//! Checkout Flow
//!
//! Explicit state object for the storefront. UI events call the methods
//! below; nothing here touches the network.

use tunes_core::wire::{CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse};

use crate::checkout::{Branding, CheckoutFailure, CheckoutOptions, CheckoutResult};
use crate::draft::{OrderDraft, Package};
use crate::error::{ClientError, Result};

/// Page section the customer is on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Home,
    PackageSelected,
    LanguageAndDescriptionEntered,
    PaymentSubmitted,
    PaymentSucceeded,
    PaymentFailed,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Home => "home",
            Stage::PackageSelected => "package selected",
            Stage::LanguageAndDescriptionEntered => "entering details",
            Stage::PaymentSubmitted => "payment submitted",
            Stage::PaymentSucceeded => "payment succeeded",
            Stage::PaymentFailed => "payment failed",
        }
    }

    /// Position along the forward path, for back navigation
    const fn rank(self) -> u8 {
        match self {
            Stage::Home => 0,
            Stage::PackageSelected => 1,
            Stage::LanguageAndDescriptionEntered | Stage::PaymentFailed => 2,
            Stage::PaymentSubmitted => 3,
            Stage::PaymentSucceeded => 4,
        }
    }
}

/// Storefront checkout state
#[derive(Clone, Debug, Default)]
pub struct CheckoutFlow {
    stage: Stage,
    draft: OrderDraft,
    in_flight: bool,
    error: Option<String>,
    created: Option<CreateOrderResponse>,
    redirect_url: Option<String>,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn stage(&self) -> Stage {
        self.stage
    }

    pub const fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Whether a server call is running; the pay control is disabled while true
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Message shown next to the payment form
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Order created by the last submission, if any
    pub const fn created_order(&self) -> Option<&CreateOrderResponse> {
        self.created.as_ref()
    }

    /// Where to send the browser after a verified payment
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Pick a package card and show the details section
    pub fn choose_package(&mut self, package: Package) {
        self.draft.package = package;
        self.stage = Stage::PackageSelected;
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.draft.language = language.into();
    }

    /// Save the description and show the payment form
    pub fn continue_to_payment(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.stage = Stage::LanguageAndDescriptionEntered;
    }

    pub fn set_customer(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        mobile: impl Into<String>,
    ) {
        self.draft.name = name.into();
        self.draft.email = email.into();
        self.draft.mobile = mobile.into();
    }

    /// Re-show an earlier section; entered fields are kept
    pub fn back_to(&mut self, stage: Stage) -> Result<()> {
        if self.in_flight || stage.rank() >= self.stage.rank() {
            return Err(ClientError::InvalidStage {
                action: "go back",
                stage: self.stage.as_str(),
            });
        }
        self.stage = stage;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Take the submit guard and build the create-order body
    pub fn begin_submit(&mut self) -> Result<CreateOrderRequest> {
        if self.in_flight {
            return Err(ClientError::Busy);
        }
        if !matches!(
            self.stage,
            Stage::LanguageAndDescriptionEntered | Stage::PaymentFailed
        ) {
            return Err(ClientError::InvalidStage {
                action: "submit payment",
                stage: self.stage.as_str(),
            });
        }

        self.in_flight = true;
        self.error = None;
        self.created = None;
        self.stage = Stage::PaymentSubmitted;
        Ok(self.draft.to_request())
    }

    /// Order exists on the server; build the widget options
    ///
    /// The guard stays taken until the widget reports back.
    pub fn order_created(
        &mut self,
        order: CreateOrderResponse,
        branding: &Branding,
    ) -> CheckoutOptions {
        let options = CheckoutOptions::for_order(&order, branding);
        tracing::debug!(order_id = %order.order_id, "Opening hosted checkout");
        self.created = Some(order);
        options
    }

    /// Widget success handler: build the verification body
    ///
    /// The widget stays open after a `payment.failed` event, so a later
    /// success for the same gateway order is accepted and takes the submit
    /// guard again.
    pub fn payment_authorized(&mut self, result: &CheckoutResult) -> Result<VerifyPaymentRequest> {
        if !matches!(self.stage, Stage::PaymentSubmitted | Stage::PaymentFailed) {
            return Err(ClientError::InvalidStage {
                action: "verify payment",
                stage: self.stage.as_str(),
            });
        }
        let order = self.created.as_ref().ok_or(ClientError::InvalidStage {
            action: "verify payment",
            stage: self.stage.as_str(),
        })?;
        if order.gateway_order_id != result.razorpay_order_id {
            return Err(ClientError::UnknownOrder(result.razorpay_order_id.clone()));
        }

        let request = result.to_verify_request(order.order_id);
        self.in_flight = true;
        self.error = None;
        self.stage = Stage::PaymentSubmitted;
        Ok(request)
    }

    /// Server confirmed the payment
    pub fn payment_verified(&mut self, response: &VerifyPaymentResponse) {
        self.in_flight = false;
        self.error = None;
        self.redirect_url = Some(response.redirect_url.clone());
        self.stage = Stage::PaymentSucceeded;
    }

    /// Widget `payment.failed` handler
    pub fn gateway_failed(&mut self, failure: &CheckoutFailure) {
        self.fail(format!("Payment failed: {}", failure.description));
    }

    /// Customer closed the widget without paying
    pub fn checkout_dismissed(&mut self) {
        self.in_flight = false;
        if self.stage == Stage::PaymentSubmitted {
            self.stage = Stage::LanguageAndDescriptionEntered;
        }
    }

    /// Any other failure on the submit path
    pub fn fail(&mut self, message: impl Into<String>) {
        self.in_flight = false;
        self.error = Some(message.into());
        self.stage = Stage::PaymentFailed;
    }
}
