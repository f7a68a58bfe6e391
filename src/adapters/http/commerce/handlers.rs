//! HTTP handlers for checkout, payment callbacks and subscriptions.

use axum::extract::{Json, State};
use axum::http::StatusCode;

use crate::application::handlers::commerce::{
    CreateOrderCommand, CreateSubscriptionOrderCommand, ReportPaymentFailureCommand, VerifyPaymentCommand,
};

use super::super::error::{parse_id, ApiError};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{
    CheckoutResponse, CreateOrderRequest, CreateSubscriptionOrderRequest, PaymentFailureRequest,
    PaymentResponse, PlanResponse, SubscriptionResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let order = state
        .create_order_handler()
        .handle(CreateOrderCommand {
            user,
            kind: request.kind,
            item_id: parse_id(&request.item_id, "item id")?,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// POST /api/orders/subscription
pub async fn create_subscription_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateSubscriptionOrderRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let checkout = state
        .create_subscription_order_handler()
        .handle(CreateSubscriptionOrderCommand {
            user,
            plan_id: parse_id(&request.plan_id, "plan id")?,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(checkout.into())))
}

/// POST /api/payments/verify
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let result = state
        .verify_payment_handler()
        .handle(VerifyPaymentCommand {
            user,
            payment_id: parse_id(&request.payment_id, "payment id")?,
            gateway_order_id: request.razorpay_order_id,
            gateway_payment_id: request.razorpay_payment_id,
            signature: request.razorpay_signature,
        })
        .await?;
    Ok(Json(VerifyPaymentResponse {
        success: true,
        payment_id: result.payment.id,
        status: result.payment.status,
        newly_granted: result.newly_granted,
    }))
}

/// POST /api/payments/failure
pub async fn report_payment_failure(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<PaymentFailureRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = state
        .report_payment_failure_handler()
        .handle(ReportPaymentFailureCommand {
            user,
            payment_id: parse_id(&request.payment_id, "payment id")?,
            reason: request.reason,
        })
        .await?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// GET /api/subscription
pub async fn get_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    let view = state.get_subscription_handler().handle(&user).await?;
    Ok(Json(view.into()))
}

/// POST /api/subscription/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    state.cancel_subscription_handler().handle(&user).await?;
    let view = state.get_subscription_handler().handle(&user).await?;
    Ok(Json(view.into()))
}

/// GET /api/plans - active plans only
pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = state.list_plans_handler().handle(false).await?;
    Ok(Json(plans.iter().map(PlanResponse::from).collect()))
}
