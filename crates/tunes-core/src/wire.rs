//! Wire Types
//!
//! Request and response bodies for every endpoint. Shared by the server and
//! the client so both sides agree on field names.

use serde::{Deserialize, Serialize};

use crate::model::OrderId;

/// Path of the success page the client is redirected to
pub const PAYMENT_SUCCESS_PATH: &str = "/payment-success";

/// Path of the downloadable receipt
pub const DOWNLOAD_RECEIPT_PATH: &str = "/download-receipt";

/// Minimal `{success, message}` envelope returned on every failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `POST /create-order` body
///
/// Fields default to empty so a missing field is reported by name during
/// validation rather than as a JSON error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "packageName")]
    pub package_name: String,
    #[serde(default, rename = "packagePrice")]
    pub package_price: String,
}

/// `POST /create-order` success body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub message: String,
    pub order_id: OrderId,
    pub gateway_order_id: String,
    pub gateway_key_id: String,
    /// Amount in minor units
    pub amount: i64,
    #[serde(rename = "packageName")]
    pub package_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_mobile: String,
}

/// Local order id as sent by browsers: either a JSON number or a string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderIdInput {
    Number(i64),
    Text(String),
}

impl OrderIdInput {
    pub fn parse(&self) -> Option<OrderId> {
        match self {
            OrderIdInput::Number(n) if *n > 0 => Some(OrderId::new(*n)),
            OrderIdInput::Number(_) => None,
            OrderIdInput::Text(s) => OrderId::parse(s),
        }
    }
}

impl From<OrderId> for OrderIdInput {
    fn from(id: OrderId) -> Self {
        OrderIdInput::Number(id.get())
    }
}

/// `POST /verify-payment` body
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub gateway_payment_id: String,
    #[serde(default)]
    pub gateway_order_id: String,
    #[serde(default)]
    pub gateway_signature: String,
    #[serde(default)]
    pub order_id: Option<OrderIdInput>,
}

/// `POST /verify-payment` success body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub order_id: OrderId,
    pub gateway_payment_id: String,
    pub redirect_url: String,
}

/// `POST /contact` body
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Query string of the success and receipt pages
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptQuery {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

impl ReceiptQuery {
    /// Both parameters, when present and well-formed
    pub fn parse(&self) -> Option<(OrderId, &str)> {
        let order_id = OrderId::parse(self.order_id.as_deref()?)?;
        let payment_id = self.payment_id.as_deref().map(str::trim)?;
        if payment_id.is_empty() {
            return None;
        }
        Some((order_id, payment_id))
    }
}

/// Redirect target handed back after a successful verification
pub fn success_redirect(order_id: OrderId, payment_id: &str) -> String {
    format!(
        "{PAYMENT_SUCCESS_PATH}?order_id={order_id}&payment_id={}",
        urlencoding::encode(payment_id)
    )
}

/// Link to the downloadable receipt for a paid order
pub fn receipt_link(order_id: OrderId, payment_id: &str) -> String {
    format!(
        "{DOWNLOAD_RECEIPT_PATH}?order_id={order_id}&payment_id={}",
        urlencoding::encode(payment_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_field_names() {
        let body = serde_json::json!({
            "name": "A",
            "email": "a@x.com",
            "mobile": "999",
            "language": "English",
            "description": "d",
            "packageName": "Premium",
            "packagePrice": "₹999",
        });
        let req: CreateOrderRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.package_name, "Premium");
        assert_eq!(req.package_price, "₹999");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: CreateOrderRequest = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(req.name, "A");
        assert!(req.email.is_empty());
    }

    #[test]
    fn test_order_id_input_accepts_number_or_string() {
        let req: VerifyPaymentRequest = serde_json::from_str(r#"{"order_id": 12}"#).unwrap();
        assert_eq!(req.order_id.unwrap().parse(), Some(OrderId::new(12)));

        let req: VerifyPaymentRequest = serde_json::from_str(r#"{"order_id": "12"}"#).unwrap();
        assert_eq!(req.order_id.unwrap().parse(), Some(OrderId::new(12)));

        let req: VerifyPaymentRequest = serde_json::from_str(r#"{"order_id": 0}"#).unwrap();
        assert_eq!(req.order_id.unwrap().parse(), None);
    }

    #[test]
    fn test_success_redirect() {
        assert_eq!(
            success_redirect(OrderId::new(5), "pay_ABC123"),
            "/payment-success?order_id=5&payment_id=pay_ABC123"
        );
        assert_eq!(
            receipt_link(OrderId::new(5), "pay 1&x"),
            "/download-receipt?order_id=5&payment_id=pay%201%26x"
        );
    }

    #[test]
    fn test_receipt_query_parse() {
        let query = ReceiptQuery {
            order_id: Some("9".into()),
            payment_id: Some("pay_1".into()),
        };
        assert_eq!(query.parse(), Some((OrderId::new(9), "pay_1")));

        let missing = ReceiptQuery {
            order_id: Some("9".into()),
            payment_id: Some("  ".into()),
        };
        assert_eq!(missing.parse(), None);
        assert_eq!(ReceiptQuery::default().parse(), None);
    }
}
