//! Subscription self-service: view and cancel.

use std::sync::Arc;

use crate::domain::commerce::{CommerceError, Subscription, SubscriptionPlan, SubscriptionStatus};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::ports::{PlanRepository, SubscriptionRepository};

/// The caller's latest subscription with expiry applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionView {
    pub subscription: Subscription,
    pub effective_status: SubscriptionStatus,
    pub is_entitled: bool,
    /// `None` if the plan row was removed.
    pub plan: Option<SubscriptionPlan>,
}

pub struct GetSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
}

impl GetSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, plans: Arc<dyn PlanRepository>) -> Self {
        Self { subscriptions, plans }
    }

    /// Returns `None` when the user never subscribed.
    pub async fn handle(&self, user: &AuthenticatedUser) -> Result<Option<SubscriptionView>, CommerceError> {
        let now = Timestamp::now();

        // An active subscription outranks a newer pending checkout
        let subscription = match self.subscriptions.find_active_for_user(&user.id, now).await? {
            Some(active) => Some(active),
            None => self.subscriptions.find_latest_for_user(&user.id).await?,
        };
        let Some(subscription) = subscription else {
            return Ok(None);
        };

        let plan = self.plans.find_by_id(&subscription.plan_id).await?;
        Ok(Some(SubscriptionView {
            effective_status: subscription.effective_status(now),
            is_entitled: subscription.is_entitled(now),
            subscription,
            plan,
        }))
    }
}

pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl CancelSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(&self, user: &AuthenticatedUser) -> Result<Subscription, CommerceError> {
        let now = Timestamp::now();
        let mut subscription = self
            .subscriptions
            .find_active_for_user(&user.id, now)
            .await?
            .ok_or_else(|| CommerceError::subscription_not_found(user.id))?;

        subscription.cancel(now)?;
        self.subscriptions.update(&subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            user_id = %user.id,
            "Subscription cancelled"
        );
        Ok(subscription)
    }
}
