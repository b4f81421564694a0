//! HTTP Error Mapping
//!
//! Every failure on a JSON endpoint leaves as `{success: false, message}`
//! with a status code chosen by error kind.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tunes_core::{CoreError, wire::ApiMessage};
use tunes_payments::PaymentError;
use tunes_store::StoreError;

/// Message shown for any backend failure; the detail goes to the log only
const INTERNAL_MESSAGE: &str = "Internal server error. Please try again later.";

/// Request-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or incomplete input
    #[error("{0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Checkout signature did not verify
    #[error("Payment verification failed.")]
    Signature,

    /// Order already settled by another payment
    #[error("{0}")]
    Conflict(String),

    /// Gateway rejected the call or could not be reached
    #[error("{0}")]
    Gateway(String),

    /// Store or other backend failure
    #[error("{0}")]
    Infrastructure(String),

    /// Gateway credentials were not configured
    #[error("Payments are currently unavailable.")]
    PaymentsDisabled,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Signature => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::PaymentsDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message safe to show the customer
    pub fn user_message(&self) -> String {
        match self {
            AppError::Infrastructure(_) => INTERNAL_MESSAGE.into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Infrastructure(detail) => tracing::error!(error = %detail, "Request failed"),
            AppError::Gateway(detail) => tracing::warn!(error = %detail, "Gateway call failed"),
            other => tracing::debug!(status = status.as_u16(), error = %other, "Request rejected"),
        }
        (status, Json(ApiMessage::failure(self.user_message()))).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrderNotFound(id) => AppError::NotFound(format!("Order not found for ID: {id}")),
            StoreError::GatewayOrderMismatch(_) => {
                AppError::Validation("Gateway order does not match this order.".into())
            }
            StoreError::AlreadyPaid { .. } => {
                AppError::Conflict("Order has already been paid with a different payment.".into())
            }
            other => AppError::Infrastructure(other.to_string()),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        if err.is_signature_failure() {
            return AppError::Signature;
        }
        match err {
            PaymentError::Config(detail) => AppError::Infrastructure(detail),
            other => {
                tracing::warn!(error = %other, retryable = other.is_retryable(), "Payment error");
                AppError::Gateway(other.user_message())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunes_core::OrderId;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Signature.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Gateway("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::PaymentsDisabled.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_infrastructure_detail_is_hidden() {
        let err = AppError::Infrastructure("connection refused at 10.0.0.5".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_store_errors() {
        let err = AppError::from(StoreError::OrderNotFound(OrderId::new(7)));
        assert_eq!(err.user_message(), "Order not found for ID: 7");

        let err = AppError::from(StoreError::AlreadyPaid {
            order_id: OrderId::new(7),
            payment_id: "pay_1".into(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_payment_errors() {
        assert!(matches!(
            AppError::from(PaymentError::SignatureMismatch),
            AppError::Signature
        ));
        let err = AppError::from(PaymentError::Gateway {
            status: 401,
            message: "Authentication failed".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.user_message(), "Payment gateway error: Authentication failed");
    }

    #[test]
    fn test_missing_field_message() {
        let err = AppError::from(CoreError::MissingField("email"));
        assert_eq!(err.user_message(), "Missing required field: email");
    }
}
