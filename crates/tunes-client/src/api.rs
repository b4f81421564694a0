//! API Client

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tunes_core::wire::{
    ApiMessage, ContactRequest, CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};

use crate::error::{ClientError, Result};

/// Server endpoints the storefront calls
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<CreateOrderResponse>;

    async fn verify_payment(&self, request: &VerifyPaymentRequest) -> Result<VerifyPaymentResponse>;

    async fn send_contact(&self, request: &ContactRequest) -> Result<ApiMessage>;
}

/// `OrderApi` over HTTP
pub struct HttpOrderApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpOrderApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        decode(status.is_success(), &text)
    }
}

/// Read a response body: the typed success body, or the failure envelope
fn decode<T: DeserializeOwned>(ok_status: bool, text: &str) -> Result<T> {
    let envelope: ApiMessage = serde_json::from_str(text)
        .map_err(|e| ClientError::Decode(format!("{e}: {}", truncate(text))))?;
    if !ok_status || !envelope.success {
        return Err(ClientError::Rejected(envelope.message));
    }
    serde_json::from_str(text).map_err(|e| ClientError::Decode(e.to_string()))
}

fn truncate(text: &str) -> &str {
    text.char_indices().nth(120).map_or(text, |(i, _)| &text[..i])
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<CreateOrderResponse> {
        self.post("/create-order", request).await
    }

    async fn verify_payment(&self, request: &VerifyPaymentRequest) -> Result<VerifyPaymentResponse> {
        self.post("/verify-payment", request).await
    }

    async fn send_contact(&self, request: &ContactRequest) -> Result<ApiMessage> {
        self.post("/contact", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failure_envelope() {
        let err = decode::<ApiMessage>(false, r#"{"success":false,"message":"Missing required field: email"}"#)
            .unwrap_err();
        assert_eq!(err, ClientError::Rejected("Missing required field: email".into()));
    }

    #[test]
    fn test_decode_success_body() {
        let body = r#"{"success":true,"message":"Payment verified successfully.","order_id":3,
            "gateway_payment_id":"pay_3","redirect_url":"/payment-success?order_id=3&payment_id=pay_3"}"#;
        let resp: VerifyPaymentResponse = decode(true, body).unwrap();
        assert_eq!(resp.gateway_payment_id, "pay_3");
    }

    #[test]
    fn test_decode_non_json() {
        let err = decode::<ApiMessage>(false, "<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = HttpOrderApi::with_client(reqwest::Client::new(), "http://localhost:3000/");
        assert_eq!(api.base_url, "http://localhost:3000");
    }
}
