//! Razorpay Integration
//!
//! Thin REST client over `https://api.razorpay.com/v1` with HTTP basic auth
//! (`key_id:key_secret`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{PaymentError, Result};
use crate::gateway::{GatewayOrder, GatewayOrderRequest, GatewayPayment, PaymentGateway, PaymentSignature};
use crate::signature;

const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

/// Razorpay client configuration
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id (`rzp_test_...` / `rzp_live_...`)
    pub key_id: String,

    /// Merchant secret; also the HMAC key for checkout signatures
    pub key_secret: String,

    /// REST API base URL
    pub api_base: String,

    /// Timeout for every outbound call
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            api_base: DEFAULT_API_BASE.into(),
            timeout_secs: 15,
        }
    }

    /// Load from environment variables
    ///
    /// Credentials have no defaults; a missing key disables payments.
    pub fn from_env() -> Result<Self> {
        let key_id = non_empty_env("RAZORPAY_KEY_ID")
            .ok_or_else(|| PaymentError::Config("RAZORPAY_KEY_ID not set".into()))?;
        let key_secret = non_empty_env("RAZORPAY_KEY_SECRET")
            .ok_or_else(|| PaymentError::Config("RAZORPAY_KEY_SECRET not set".into()))?;

        let mut config = Self::new(key_id, key_secret);
        if let Some(base) = non_empty_env("RAZORPAY_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_owned();
        }
        if let Some(timeout) = non_empty_env("GATEWAY_TIMEOUT_SECS").and_then(|t| t.parse().ok()) {
            config.timeout_secs = timeout;
        }
        Ok(config)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Razorpay error body: `{"error": {"code": "...", "description": "..."}}`
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Razorpay client
pub struct RazorpayClient {
    http: reqwest::Client,
    config: RazorpayConfig,
}

impl RazorpayClient {
    /// Create a client with a bounded request timeout
    pub fn new(config: RazorpayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaymentError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(RazorpayConfig::from_env()?)
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| {
                body.error
                    .description
                    .or(body.error.code)
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());

        Err(PaymentError::Gateway {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder> {
        tracing::debug!(amount = request.amount, receipt = %request.receipt, "Creating Razorpay order");

        let response = self
            .http
            .post(self.url("/orders"))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(request)
            .send()
            .await?;

        let order: GatewayOrder = Self::read(response).await?;
        tracing::info!(gateway_order_id = %order.id, amount = order.amount, "Razorpay order created");
        Ok(order)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment> {
        let response = self
            .http
            .get(self.url(&format!("/payments/{payment_id}")))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await?;

        Self::read(response).await
    }

    fn verify_signature(&self, sig: &PaymentSignature) -> Result<()> {
        signature::verify(
            &self.config.key_secret,
            &sig.gateway_order_id,
            &sig.gateway_payment_id,
            &sig.signature,
        )
    }

    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    fn name(&self) -> &str {
        "razorpay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = RazorpayConfig::new("rzp_test_abc", "super_secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("rzp_test_abc"));
        assert!(!debug.contains("super_secret"));
    }

    #[test]
    fn test_error_body_parse() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"The amount must be atleast INR 1.00"}}"#;
        let parsed: ErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.error.description.as_deref(),
            Some("The amount must be atleast INR 1.00")
        );
    }

    #[test]
    fn test_client_verifies_with_secret() {
        let client = RazorpayClient::new(RazorpayConfig::new("rzp_test_abc", "secret")).unwrap();
        let sig = PaymentSignature {
            gateway_order_id: "order_1".into(),
            gateway_payment_id: "pay_1".into(),
            signature: signature::sign("secret", "order_1", "pay_1"),
        };
        assert!(client.verify_signature(&sig).is_ok());
        assert_eq!(client.key_id(), "rzp_test_abc");
    }

    #[test]
    fn test_url_join() {
        let client = RazorpayClient::new(RazorpayConfig::new("k", "s")).unwrap();
        assert_eq!(client.url("/orders"), "https://api.razorpay.com/v1/orders");
    }
}
