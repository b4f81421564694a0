//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Gateway rejected the request
    #[error("Gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// Gateway could not be reached or timed out
    #[error("Gateway unreachable: {0}")]
    Network(String),

    /// Gateway answered with a body we could not read
    #[error("Gateway response invalid: {0}")]
    InvalidResponse(String),

    /// Signature did not match
    #[error("Payment signature verification failed")]
    SignatureMismatch,

    /// Signature was not valid hex
    #[error("Malformed payment signature: {0}")]
    MalformedSignature(String),

    /// Payment exists but is not captured
    #[error("Payment not captured (status: {0})")]
    NotCaptured(String),

    /// Payment belongs to a different gateway order
    #[error("Payment {payment_id} does not belong to order {order_id}")]
    OrderMismatch { payment_id: String, order_id: String },

    /// Captured amount differs from the order amount
    #[error("Amount mismatch: expected {expected}, captured {actual}")]
    AmountMismatch { expected: i64, actual: i64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::Network(_) => true,
            PaymentError::Gateway { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the error comes from signature checking
    pub fn is_signature_failure(&self) -> bool {
        matches!(
            self,
            PaymentError::SignatureMismatch | PaymentError::MalformedSignature(_)
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::Gateway { message, .. } => format!("Payment gateway error: {message}"),
            PaymentError::Network(_) => "Payment gateway is unreachable. Please try again.".into(),
            PaymentError::SignatureMismatch | PaymentError::MalformedSignature(_) => {
                "Payment verification failed.".into()
            }
            PaymentError::NotCaptured(status) => {
                format!("Payment not captured (status: {status}).")
            }
            PaymentError::OrderMismatch { .. } | PaymentError::AmountMismatch { .. } => {
                "Payment does not match this order.".into()
            }
            PaymentError::Config(_) => "Payment service configuration error.".into(),
            PaymentError::InvalidResponse(_) => "An error occurred processing your payment.".into(),
        }
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PaymentError::InvalidResponse(err.to_string())
        } else {
            PaymentError::Network(err.to_string())
        }
    }
}
