//! Mock Gateway
//!
//! For tests and local development. Orders are kept in memory; payments are
//! registered explicitly with [`MockGateway::capture`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{PaymentError, Result};
use crate::gateway::{GatewayOrder, GatewayOrderRequest, GatewayPayment, PaymentGateway, PaymentSignature};
use crate::signature;

#[derive(Default)]
struct MockState {
    orders: HashMap<String, GatewayOrder>,
    payments: HashMap<String, GatewayPayment>,
    fail_next_order: Option<String>,
}

/// In-memory gateway that signs and verifies like the real one
pub struct MockGateway {
    key_id: String,
    key_secret: String,
    state: Mutex<MockState>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new("rzp_test_mock", "mock_secret")
    }
}

impl MockGateway {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Sign a checkout result the way the hosted widget would
    pub fn sign(&self, gateway_order_id: &str, payment_id: &str) -> String {
        signature::sign(&self.key_secret, gateway_order_id, payment_id)
    }

    /// Register a payment against a gateway order with the given status
    pub async fn register_payment(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        status: &str,
    ) -> Result<GatewayPayment> {
        let mut state = self.state.lock().await;
        let order = state
            .orders
            .get(gateway_order_id)
            .cloned()
            .ok_or_else(|| PaymentError::Gateway {
                status: 400,
                message: format!("The id provided does not exist: {gateway_order_id}"),
            })?;

        let payment = GatewayPayment {
            id: payment_id.to_owned(),
            amount: order.amount,
            currency: order.currency,
            status: status.to_owned(),
            order_id: Some(gateway_order_id.to_owned()),
            method: Some("upi".into()),
        };
        state.payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    /// Register a captured payment and return its signature
    pub async fn capture(&self, gateway_order_id: &str, payment_id: &str) -> Result<PaymentSignature> {
        self.register_payment(gateway_order_id, payment_id, "captured")
            .await?;
        Ok(PaymentSignature {
            gateway_order_id: gateway_order_id.to_owned(),
            gateway_payment_id: payment_id.to_owned(),
            signature: self.sign(gateway_order_id, payment_id),
        })
    }

    /// Make the next `create_order` call fail with this message
    pub async fn fail_next_order(&self, message: impl Into<String>) {
        self.state.lock().await.fail_next_order = Some(message.into());
    }

    /// Orders created so far
    pub async fn orders(&self) -> Vec<GatewayOrder> {
        self.state.lock().await.orders.values().cloned().collect()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.fail_next_order.take() {
            return Err(PaymentError::Gateway {
                status: 400,
                message,
            });
        }

        let id = format!("order_{}", uuid::Uuid::new_v4().simple());
        let order = GatewayOrder {
            id: id.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: "created".into(),
        };
        state.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment> {
        self.state
            .lock()
            .await
            .payments
            .get(payment_id)
            .cloned()
            .ok_or_else(|| PaymentError::Gateway {
                status: 400,
                message: format!("The id provided does not exist: {payment_id}"),
            })
    }

    fn verify_signature(&self, sig: &PaymentSignature) -> Result<()> {
        signature::verify(
            &self.key_secret,
            &sig.gateway_order_id,
            &sig.gateway_payment_id,
            &sig.signature,
        )
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_order_and_capture() {
        let gateway = MockGateway::default();
        let order = gateway
            .create_order(&GatewayOrderRequest::new(99_900, "INR", "order_rcpt_1"))
            .await
            .unwrap();
        assert!(order.id.starts_with("order_"));
        assert_eq!(order.receipt.as_deref(), Some("order_rcpt_1"));

        let sig = gateway.capture(&order.id, "pay_1").await.unwrap();
        assert!(gateway.verify_signature(&sig).is_ok());

        let payment = gateway.fetch_payment("pay_1").await.unwrap();
        assert!(payment.ensure_settles(&order.id, 99_900).is_ok());
    }

    #[tokio::test]
    async fn test_fail_next_order() {
        let gateway = MockGateway::default();
        gateway.fail_next_order("Authentication failed").await;

        let request = GatewayOrderRequest::new(100, "INR", "order_rcpt_2");
        let err = gateway.create_order(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::Gateway { .. }));

        // only the next call fails
        assert!(gateway.create_order(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_payment() {
        let gateway = MockGateway::default();
        assert!(gateway.fetch_payment("pay_missing").await.is_err());
    }
}
