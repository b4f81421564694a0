//! Checkout Service
//!
//! Endpoint logic, independent of HTTP extraction. Each operation takes the
//! shared [`AppState`] and a decoded request body.
//!
//! ```text
//! create_order:   validate → insert Pending → gateway order → attach id
//! verify_payment: fields → signature → load order → match gateway id
//!                 → re-fetch payment (captured, same order, same amount)
//!                 → settle (one transaction)
//! ```

use serde_json::json;
use tracing::instrument;
use tunes_core::wire::{
    ApiMessage, ContactRequest, CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest,
    VerifyPaymentResponse, success_redirect,
};
use tunes_core::{ContactIntake, Order, OrderId, OrderIntake};
use tunes_payments::{GatewayOrderRequest, PaymentSignature};
use tunes_store::Settlement;

use crate::error::AppError;
use crate::state::AppState;

/// Create a local order and its gateway counterpart
#[instrument(skip_all, fields(package = %req.package_name))]
pub async fn create_order(
    state: &AppState,
    req: &CreateOrderRequest,
) -> Result<CreateOrderResponse, AppError> {
    let intake = OrderIntake::try_from(req)?;
    let gateway = state.gateway()?;

    let order = state.store.insert_order(intake.order).await?;
    tracing::info!(order_id = %order.id, "Order inserted");

    let request = GatewayOrderRequest::new(
        intake.amount_minor,
        state.checkout.currency.as_str(),
        order.id.receipt_label(),
    )
    .with_notes(json!({ "database_order_id": order.id }));

    let gateway_order = gateway.create_order(&request).await.map_err(|e| {
        tracing::warn!(order_id = %order.id, "Order left Pending without a gateway order");
        AppError::from(e)
    })?;

    state
        .store
        .attach_gateway_order(order.id, &gateway_order.id)
        .await?;

    Ok(CreateOrderResponse {
        success: true,
        message: "Order created successfully.".into(),
        order_id: order.id,
        gateway_order_id: gateway_order.id,
        gateway_key_id: gateway.key_id().to_owned(),
        amount: intake.amount_minor,
        package_name: order.package_name,
        customer_name: order.customer_name,
        customer_email: order.customer_email,
        customer_mobile: order.customer_mobile,
    })
}

/// Verify a signed checkout result and settle the order
#[instrument(skip_all, fields(payment_id = %req.gateway_payment_id))]
pub async fn verify_payment(
    state: &AppState,
    req: &VerifyPaymentRequest,
) -> Result<VerifyPaymentResponse, AppError> {
    let (order_id, signature) = verify_fields(req)?;
    let gateway = state.gateway()?;

    // no store access before the signature holds
    gateway.verify_signature(&signature)?;

    let order = state
        .store
        .get_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found for ID: {order_id}")))?;

    if order.gateway_order_id.as_deref() != Some(signature.gateway_order_id.as_str()) {
        tracing::warn!(order_id = %order_id, "Gateway order id does not match stored order");
        return Err(AppError::Validation(
            "Gateway order does not match this order.".into(),
        ));
    }

    if order.is_settled_by(&signature.gateway_payment_id) {
        tracing::info!(order_id = %order_id, "Payment already verified");
        return Ok(verified(order_id, signature.gateway_payment_id, true));
    }
    if order.is_paid() {
        return Err(AppError::Conflict(
            "Order has already been paid with a different payment.".into(),
        ));
    }

    let payment = gateway.fetch_payment(&signature.gateway_payment_id).await?;
    payment.ensure_settles(&signature.gateway_order_id, order.amount_minor()?)?;

    let outcome = state
        .store
        .settle_payment(&Settlement {
            order_id,
            gateway_order_id: signature.gateway_order_id,
            gateway_payment_id: signature.gateway_payment_id.clone(),
            method: payment.method_or(gateway.name()),
        })
        .await?;

    if !outcome.is_replay() {
        tracing::info!(order_id = %outcome.order().id, "Order marked Paid");
    }
    Ok(verified(order_id, signature.gateway_payment_id, outcome.is_replay()))
}

fn verify_fields(req: &VerifyPaymentRequest) -> Result<(OrderId, PaymentSignature), AppError> {
    let field = |name: &str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            Err(AppError::Validation(format!("Missing required field: {name}")))
        } else {
            Ok(value.to_owned())
        }
    };

    let gateway_payment_id = field("gateway_payment_id", &req.gateway_payment_id)?;
    let gateway_order_id = field("gateway_order_id", &req.gateway_order_id)?;
    let signature = field("gateway_signature", &req.gateway_signature)?;
    let order_id = req
        .order_id
        .as_ref()
        .ok_or_else(|| AppError::Validation("Missing required field: order_id".into()))?
        .parse()
        .ok_or_else(|| AppError::Validation("Invalid order id.".into()))?;

    Ok((
        order_id,
        PaymentSignature {
            gateway_order_id,
            gateway_payment_id,
            signature,
        },
    ))
}

fn verified(order_id: OrderId, payment_id: String, replay: bool) -> VerifyPaymentResponse {
    let message = if replay {
        "Payment already verified."
    } else {
        "Payment verified successfully."
    };
    VerifyPaymentResponse {
        success: true,
        message: message.into(),
        order_id,
        redirect_url: success_redirect(order_id, &payment_id),
        gateway_payment_id: payment_id,
    }
}

/// Store a contact form submission
#[instrument(skip_all)]
pub async fn submit_contact(state: &AppState, req: &ContactRequest) -> Result<ApiMessage, AppError> {
    let ContactIntake(inquiry) = ContactIntake::try_from(req)?;
    let stored = state.store.insert_contact(inquiry).await?;
    tracing::info!(inquiry_id = stored.id, "Contact inquiry stored");
    Ok(ApiMessage::ok("Your message has been sent successfully!"))
}

/// Paid order settled by `payment_id`, if any
///
/// Unknown orders, unpaid orders and foreign payment ids all come back as
/// `None` so the receipt pages cannot be used to probe order data.
#[instrument(skip(state))]
pub async fn paid_order(
    state: &AppState,
    order_id: OrderId,
    payment_id: &str,
) -> Result<Option<Order>, AppError> {
    let order = state.store.get_order(order_id).await?;
    Ok(order.filter(|o| o.is_settled_by(payment_id)))
}
