//! HTTP Handlers

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tunes_core::receipt::{receipt_filename, render_receipt, render_success_page};
use tunes_core::wire::{
    ApiMessage, ContactRequest, CreateOrderRequest, CreateOrderResponse, ReceiptQuery,
    VerifyPaymentRequest, VerifyPaymentResponse,
};
use tunes_core::Order;

use crate::error::AppError;
use crate::service;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store_backend: String,
    pub store_connected: bool,
    pub gateway_configured: bool,
}

/// Plain-text failures of the HTML pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    InvalidDetails,
    NotFound,
    Internal,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            PageError::InvalidDetails => (StatusCode::BAD_REQUEST, "Invalid payment details."),
            PageError::NotFound => (StatusCode::NOT_FOUND, "Order not found."),
            PageError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error."),
        };
        (status, body).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        store_backend: state.store.name().to_owned(),
        store_connected: state.store.health_check().await,
        gateway_configured: state.gateway.is_some(),
    })
}

/// `POST /create-order`
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let Json(req) = payload?;
    service::create_order(&state, &req).await.map(Json)
}

/// `POST /verify-payment`
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let Json(req) = payload?;
    service::verify_payment(&state, &req).await.map(Json)
}

/// `POST /contact`
pub async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ApiMessage>, AppError> {
    let Json(req) = payload?;
    service::submit_contact(&state, &req).await.map(Json)
}

/// `GET /payment-success`
pub async fn payment_success(
    State(state): State<AppState>,
    Query(query): Query<ReceiptQuery>,
) -> Result<Html<String>, PageError> {
    let (order, payment_id) = load_paid_order(&state, &query).await?;
    Ok(Html(render_success_page(&order, &payment_id, &state.checkout.currency)))
}

/// `GET /download-receipt`
pub async fn download_receipt(
    State(state): State<AppState>,
    Query(query): Query<ReceiptQuery>,
) -> Result<Response, PageError> {
    let (order, payment_id) = load_paid_order(&state, &query).await?;
    let disposition = format!("attachment; filename={}", receipt_filename(order.id));

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_receipt(&order, &payment_id, &state.checkout.currency),
    )
        .into_response())
}

async fn load_paid_order(
    state: &AppState,
    query: &ReceiptQuery,
) -> Result<(Order, String), PageError> {
    let (order_id, payment_id) = query.parse().ok_or(PageError::InvalidDetails)?;

    match service::paid_order(state, order_id, payment_id).await {
        Ok(Some(order)) => Ok((order, payment_id.to_owned())),
        Ok(None) => Err(PageError::NotFound),
        Err(e) => {
            tracing::error!(order_id = %order_id, error = %e, "Receipt lookup failed");
            Err(PageError::Internal)
        }
    }
}
