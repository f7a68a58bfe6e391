//! CreateSubscriptionOrderHandler - Command handler for starting a subscription checkout.
//!
//! Creates a PENDING subscription and a PENDING payment linked to it. The
//! subscription becomes ACTIVE only when the payment is verified.

use std::sync::Arc;

use crate::domain::commerce::{
    receipt_for, to_minor_units, CommerceError, Payment, PaymentPurpose, Subscription,
};
use crate::domain::foundation::{AuthenticatedUser, PaymentId, PlanId, SubscriptionId, Timestamp};
use crate::ports::{CreateOrderRequest, PaymentGateway, PaymentRepository, PlanRepository, SubscriptionRepository};

use super::CheckoutOrder;

#[derive(Debug, Clone)]
pub struct CreateSubscriptionOrderCommand {
    pub user: AuthenticatedUser,
    pub plan_id: PlanId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCheckout {
    pub order: CheckoutOrder,
    pub subscription_id: SubscriptionId,
}

pub struct CreateSubscriptionOrderHandler {
    plans: Arc<dyn PlanRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl CreateSubscriptionOrderHandler {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            plans,
            subscriptions,
            payments,
            gateway,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: CreateSubscriptionOrderCommand) -> Result<SubscriptionCheckout, CommerceError> {
        // 1. Plan must exist and be on sale
        let plan = self
            .plans
            .find_by_id(&cmd.plan_id)
            .await?
            .filter(|plan| plan.active)
            .ok_or_else(|| CommerceError::plan_not_found(cmd.plan_id))?;

        // 2. One active subscription at a time
        if self
            .subscriptions
            .find_active_for_user(&cmd.user.id, Timestamp::now())
            .await?
            .is_some()
        {
            return Err(CommerceError::already_subscribed(cmd.user.id));
        }

        // 3. Gateway order first, so a rejection leaves nothing behind
        let amount = to_minor_units(plan.price)?;
        let payment_id = PaymentId::new();
        let subscription = Subscription::pending(cmd.user.id, plan.id, plan.duration_days);
        let purpose = PaymentPurpose::Subscription {
            plan_id: plan.id,
            subscription_id: subscription.id,
        };
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount,
                currency: self.currency.clone(),
                receipt: receipt_for(&payment_id),
                notes: vec![
                    ("type".to_string(), purpose.type_str().to_string()),
                    ("planId".to_string(), plan.id.to_string()),
                    ("subscriptionId".to_string(), subscription.id.to_string()),
                    ("userId".to_string(), cmd.user.id.to_string()),
                ],
            })
            .await?;

        // 4. Persist pending subscription and payment together
        let payment = Payment::pending(
            payment_id,
            cmd.user.id,
            amount,
            self.currency.clone(),
            order.id.clone(),
            purpose,
        );
        self.payments
            .insert_subscription_checkout(&payment, &subscription)
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            subscription_id = %subscription.id,
            user_id = %cmd.user.id,
            plan_id = %plan.id,
            amount,
            "Subscription checkout created"
        );

        Ok(SubscriptionCheckout {
            order: CheckoutOrder {
                payment_id: payment.id,
                gateway_order_id: order.id,
                amount,
                currency: self.currency.clone(),
                key_id: self.gateway.public_key_id(),
            },
            subscription_id: subscription.id,
        })
    }
}
