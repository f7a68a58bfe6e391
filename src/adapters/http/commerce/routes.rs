//! Router for checkout, payment and subscription endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{
    cancel_subscription, create_order, create_subscription_order, get_subscription, list_plans,
    report_payment_failure, verify_payment,
};

/// Mounted under `/api`.
///
/// - `POST /orders` - order for a paid blog or resource
/// - `POST /orders/subscription` - order for a subscription plan
/// - `POST /payments/verify` - checkout callback
/// - `POST /payments/failure` - client-reported failed checkout
/// - `GET /subscription` - my subscription
/// - `POST /subscription/cancel` - cancel my subscription
/// - `GET /plans` - active plans
pub fn commerce_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/subscription", post(create_subscription_order))
        .route("/payments/verify", post(verify_payment))
        .route("/payments/failure", post(report_payment_failure))
        .route("/subscription", get(get_subscription))
        .route("/subscription/cancel", post(cancel_subscription))
        .route("/plans", get(list_plans))
}
