//! Subscription and plan repository ports.

use async_trait::async_trait;

use crate::domain::commerce::{Subscription, SubscriptionPlan};
use crate::domain::foundation::{DomainError, PlanId, SubscriptionId, Timestamp, UserId};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn insert(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Most recently created subscription of the user, in any status.
    async fn find_latest_for_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError>;

    /// An ACTIVE subscription with `end_date >= now`, if any.
    async fn find_active_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError>;
}

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn insert(&self, plan: &SubscriptionPlan) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `PlanNotFound` if the plan doesn't exist
    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError>;

    /// Cheapest first.
    async fn list(&self, include_inactive: bool) -> Result<Vec<SubscriptionPlan>, DomainError>;
}
