//! Async Drivers
//!
//! Run a [`CheckoutFlow`] step against an [`OrderApi`]. Every error path
//! releases the submit guard and records the message on the flow.

use crate::api::OrderApi;
use crate::checkout::{Branding, CheckoutOptions, CheckoutResult};
use crate::error::Result;
use crate::flow::CheckoutFlow;

/// Create the order and return the options for the hosted checkout
pub async fn submit_order(
    flow: &mut CheckoutFlow,
    api: &dyn OrderApi,
    branding: &Branding,
) -> Result<CheckoutOptions> {
    let request = flow.begin_submit()?;

    match api.create_order(&request).await {
        Ok(order) => Ok(flow.order_created(order, branding)),
        Err(e) => {
            tracing::warn!(error = %e, "Order creation failed");
            flow.fail(e.user_message());
            Err(e)
        }
    }
}

/// Forward the widget's signed result and return the redirect target
pub async fn complete_payment(
    flow: &mut CheckoutFlow,
    api: &dyn OrderApi,
    result: &CheckoutResult,
) -> Result<String> {
    let request = match flow.payment_authorized(result) {
        Ok(request) => request,
        Err(e) => {
            flow.fail(e.user_message());
            return Err(e);
        }
    };

    match api.verify_payment(&request).await {
        Ok(response) => {
            flow.payment_verified(&response);
            Ok(response.redirect_url)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Payment verification failed");
            flow.fail(e.user_message());
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::checkout::CheckoutFailure;
    use crate::draft::Package;
    use crate::error::ClientError;
    use crate::flow::Stage;
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use tunes_core::OrderId;
    use tunes_core::wire::{
        ApiMessage, ContactRequest, CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest,
        VerifyPaymentResponse, success_redirect,
    };

    /// Scripted `OrderApi` that records what it was sent
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub create_error: Option<ClientError>,
        pub verify_error: Option<ClientError>,
        pub contact_error: Option<ClientError>,
        pub verified: Mutex<Vec<VerifyPaymentRequest>>,
        pub contacts: Mutex<Vec<ContactRequest>>,
    }

    #[async_trait]
    impl OrderApi for FakeApi {
        async fn create_order(&self, request: &CreateOrderRequest) -> Result<CreateOrderResponse> {
            if let Some(e) = &self.create_error {
                return Err(e.clone());
            }
            Ok(CreateOrderResponse {
                success: true,
                message: "Order created successfully.".into(),
                order_id: OrderId::new(1),
                gateway_order_id: "order_GW1".into(),
                gateway_key_id: "rzp_test_abc".into(),
                amount: 99_900,
                package_name: request.package_name.clone(),
                customer_name: request.name.clone(),
                customer_email: request.email.clone(),
                customer_mobile: request.mobile.clone(),
            })
        }

        async fn verify_payment(&self, request: &VerifyPaymentRequest) -> Result<VerifyPaymentResponse> {
            self.verified.lock().await.push(request.clone());
            if let Some(e) = &self.verify_error {
                return Err(e.clone());
            }
            let order_id = OrderId::new(1);
            Ok(VerifyPaymentResponse {
                success: true,
                message: "Payment verified successfully.".into(),
                order_id,
                gateway_payment_id: request.gateway_payment_id.clone(),
                redirect_url: success_redirect(order_id, &request.gateway_payment_id),
            })
        }

        async fn send_contact(&self, request: &ContactRequest) -> Result<ApiMessage> {
            self.contacts.lock().await.push(request.clone());
            match &self.contact_error {
                Some(e) => Err(e.clone()),
                None => Ok(ApiMessage::ok("Your message has been sent successfully!")),
            }
        }
    }

    fn ready() -> CheckoutFlow {
        let mut flow = CheckoutFlow::new();
        flow.choose_package(Package::premium());
        flow.continue_to_payment("d");
        flow.set_customer("A", "a@x.com", "999");
        flow
    }

    fn signed() -> CheckoutResult {
        CheckoutResult {
            razorpay_payment_id: "pay_1".into(),
            razorpay_order_id: "order_GW1".into(),
            razorpay_signature: "ab".into(),
        }
    }

    #[tokio::test]
    async fn test_happy_path() {
        let api = FakeApi::default();
        let mut flow = ready();

        let options = submit_order(&mut flow, &api, &Branding::default()).await.unwrap();
        assert_eq!(options.amount, 99_900);
        assert_eq!(options.prefill.email, "a@x.com");
        assert!(flow.is_in_flight());

        let redirect = complete_payment(&mut flow, &api, &signed()).await.unwrap();
        assert_eq!(redirect, "/payment-success?order_id=1&payment_id=pay_1");
        assert_eq!(flow.stage(), Stage::PaymentSucceeded);
        assert!(!flow.is_in_flight());

        let sent = api.verified.lock().await;
        assert_eq!(sent[0].gateway_signature, "ab");
    }

    #[tokio::test]
    async fn test_create_failure_releases_guard() {
        let api = FakeApi {
            create_error: Some(ClientError::Rejected("Missing required field: email".into())),
            ..FakeApi::default()
        };
        let mut flow = ready();

        assert!(submit_order(&mut flow, &api, &Branding::default()).await.is_err());
        assert!(!flow.is_in_flight());
        assert_eq!(flow.stage(), Stage::PaymentFailed);
        assert_eq!(flow.error(), Some("Missing required field: email"));
    }

    #[tokio::test]
    async fn test_network_failure_releases_guard() {
        let api = FakeApi {
            create_error: Some(ClientError::Network("connection refused".into())),
            ..FakeApi::default()
        };
        let mut flow = ready();

        assert!(submit_order(&mut flow, &api, &Branding::default()).await.is_err());
        assert!(!flow.is_in_flight());
        assert_eq!(
            flow.error(),
            Some("Could not reach the server. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_verification_failure_releases_guard() {
        let api = FakeApi {
            verify_error: Some(ClientError::Rejected("Payment verification failed.".into())),
            ..FakeApi::default()
        };
        let mut flow = ready();
        submit_order(&mut flow, &api, &Branding::default()).await.unwrap();

        assert!(complete_payment(&mut flow, &api, &signed()).await.is_err());
        assert!(!flow.is_in_flight());
        assert_eq!(flow.error(), Some("Payment verification failed."));
        assert_eq!(flow.redirect_url(), None);
    }

    #[tokio::test]
    async fn test_gateway_failure_then_retry() {
        let api = FakeApi::default();
        let mut flow = ready();
        submit_order(&mut flow, &api, &Branding::default()).await.unwrap();

        flow.gateway_failed(&CheckoutFailure {
            description: "Payment processing cancelled by user".into(),
            ..CheckoutFailure::default()
        });
        assert!(!flow.is_in_flight());

        submit_order(&mut flow, &api, &Branding::default()).await.unwrap();
        assert!(complete_payment(&mut flow, &api, &signed()).await.is_ok());
    }

    #[tokio::test]
    async fn test_gateway_failure_then_success_without_resubmit() {
        let api = FakeApi::default();
        let mut flow = ready();
        submit_order(&mut flow, &api, &Branding::default()).await.unwrap();

        flow.gateway_failed(&CheckoutFailure {
            description: "Card declined".into(),
            ..CheckoutFailure::default()
        });

        let redirect = complete_payment(&mut flow, &api, &signed()).await.unwrap();
        assert!(redirect.starts_with("/payment-success?"));
        assert_eq!(flow.stage(), Stage::PaymentSucceeded);
        assert_eq!(api.verified.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_completion_without_submission_is_rejected() {
        let api = FakeApi::default();
        let mut flow = ready();

        assert!(complete_payment(&mut flow, &api, &signed()).await.is_err());
        assert!(api.verified.lock().await.is_empty());
    }
}
