//! HTTP DTOs for orders, payments, subscriptions and plans.

use serde::{Deserialize, Serialize};

use crate::application::handlers::commerce::{CheckoutOrder, SubscriptionCheckout, SubscriptionView};
use crate::domain::commerce::{Payment, PaymentPurpose, PaymentStatus, SubscriptionPlan, SubscriptionStatus};
use crate::domain::content::ContentKind;
use crate::domain::foundation::{PaymentId, PlanId, SubscriptionId, Timestamp, UserId};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Start a one-time purchase of a blog or resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub item_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionOrderRequest {
    pub plan_id: String,
}

/// Checkout callback. Gateway field names are accepted in both camelCase and
/// the snake_case the checkout widget returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub payment_id: String,
    #[serde(alias = "razorpay_order_id")]
    pub razorpay_order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub razorpay_payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailureRequest {
    pub payment_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// What the client needs to open the gateway checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub payment_id: PaymentId,
    pub order_id: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<SubscriptionId>,
}

impl From<CheckoutOrder> for CheckoutResponse {
    fn from(order: CheckoutOrder) -> Self {
        Self {
            payment_id: order.payment_id,
            order_id: order.gateway_order_id,
            amount: order.amount,
            currency: order.currency,
            key_id: order.key_id,
            subscription_id: None,
        }
    }
}

impl From<SubscriptionCheckout> for CheckoutResponse {
    fn from(checkout: SubscriptionCheckout) -> Self {
        Self {
            subscription_id: Some(checkout.subscription_id),
            ..Self::from(checkout.order)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    /// False when the payment had already been verified earlier.
    pub newly_granted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub user_id: UserId,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub metadata: PaymentPurpose,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            user_id: payment.user_id,
            amount: payment.amount,
            currency: payment.currency.clone(),
            status: payment.status,
            gateway_order_id: payment.gateway_order_id.clone(),
            gateway_payment_id: payment.gateway_payment_id.clone(),
            metadata: payment.purpose,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: PlanId,
    pub name: String,
    /// Whole major units.
    pub price: i64,
    pub duration_days: i64,
    pub active: bool,
}

impl From<&SubscriptionPlan> for PlanResponse {
    fn from(plan: &SubscriptionPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.clone(),
            price: plan.price,
            duration_days: plan.duration_days,
            active: plan.active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDto {
    pub id: SubscriptionId,
    pub plan_id: PlanId,
    pub plan: Option<PlanResponse>,
    /// Status as of now; an ACTIVE row past its end date reads EXPIRED.
    pub status: SubscriptionStatus,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub is_entitled: bool,
}

/// `subscription` is null when the user never subscribed.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub subscription: Option<SubscriptionDto>,
}

impl From<Option<SubscriptionView>> for SubscriptionResponse {
    fn from(view: Option<SubscriptionView>) -> Self {
        Self {
            subscription: view.map(|view| SubscriptionDto {
                id: view.subscription.id,
                plan_id: view.subscription.plan_id,
                plan: view.plan.as_ref().map(PlanResponse::from),
                status: view.effective_status,
                start_date: view.subscription.start_date,
                end_date: view.subscription.end_date,
                is_entitled: view.is_entitled,
            }),
        }
    }
}
