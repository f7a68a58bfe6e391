use async_trait::async_trait;

use crate::domain::commerce::{
    carry_over, Payment, PaymentStatus, Subscription, SubscriptionPlan, SubscriptionStatus,
};
use crate::domain::content::ContentKind;
use crate::domain::foundation::{
    ContentId, DomainError, ErrorCode, PaymentId, PlanId, SubscriptionId, Timestamp, UserId,
};
use crate::ports::{
    Completion, EntitlementReader, GatewayConfirmation, Grant, PaymentRepository, PlanRepository,
    SubscriptionRepository,
};

use super::InMemoryStore;

#[async_trait]
impl EntitlementReader for InMemoryStore {
    async fn has_purchase(
        &self,
        user_id: &UserId,
        kind: ContentKind,
        item_id: &ContentId,
    ) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .purchases
            .iter()
            .any(|p| p.user_id == *user_id && p.kind == kind && p.item_id == *item_id))
    }

    async fn has_active_subscription(&self, user_id: &UserId, now: Timestamp) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .values()
            .any(|s| s.user_id == *user_id && s.is_entitled(now)))
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        self.state.write().await.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn insert_subscription_checkout(
        &self,
        payment: &Payment,
        subscription: &Subscription,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.subscriptions.insert(subscription.id, subscription.clone());
        state.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.state.read().await.payments.get(id).cloned())
    }

    async fn list(&self, status: Option<PaymentStatus>, limit: u32) -> Result<Vec<Payment>, DomainError> {
        let state = self.state.read().await;
        let mut payments: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments.truncate(limit as usize);
        Ok(payments)
    }

    async fn complete(
        &self,
        id: &PaymentId,
        confirmation: GatewayConfirmation,
        grant: Grant,
    ) -> Result<Completion, DomainError> {
        let mut state = self.state.write().await;

        let status = state.payments.get(id).map(|p| p.status).ok_or_else(|| {
            DomainError::new(ErrorCode::PaymentNotFound, format!("Payment not found: {}", id))
        })?;
        if status != PaymentStatus::Pending {
            return Ok(Completion::AlreadyCompleted);
        }
        // Check the grant target before writing anything
        let subscriber = match &grant {
            Grant::ActivateSubscription { subscription_id, .. } => {
                let target = state.subscriptions.get(subscription_id).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::SubscriptionNotFound,
                        format!("Subscription not found: {}", subscription_id),
                    )
                })?;
                Some(target.user_id)
            }
            Grant::Purchase(_) => None,
        };

        if let Some(payment) = state.payments.get_mut(id) {
            payment.status = PaymentStatus::Success;
            payment.gateway_payment_id = Some(confirmation.gateway_payment_id);
            payment.signature = Some(confirmation.signature);
            payment.updated_at = Timestamp::now();
        }

        match grant {
            Grant::Purchase(purchase) => {
                let exists = state.purchases.iter().any(|p| {
                    p.user_id == purchase.user_id && p.kind == purchase.kind && p.item_id == purchase.item_id
                });
                if !exists {
                    state.purchases.push(purchase);
                }
            }
            Grant::ActivateSubscription {
                subscription_id,
                start_date,
                end_date,
            } => {
                let mut replaced_end = None;
                for current in state.subscriptions.values_mut().filter(|s| {
                    Some(s.user_id) == subscriber
                        && s.id != subscription_id
                        && s.status == SubscriptionStatus::Active
                }) {
                    replaced_end = replaced_end.max(Some(current.end_date));
                    current.supersede();
                }
                if let Some(subscription) = state.subscriptions.get_mut(&subscription_id) {
                    subscription.status = SubscriptionStatus::Active;
                    subscription.start_date = start_date;
                    subscription.end_date = carry_over(start_date, end_date, replaced_end);
                }
            }
        }

        Ok(Completion::Completed)
    }

    async fn mark_failed(&self, id: &PaymentId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.payments.get_mut(id) {
            Some(payment) if payment.status == PaymentStatus::Pending => {
                payment.status = PaymentStatus::Failed;
                payment.updated_at = Timestamp::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn insert(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .subscriptions
            .insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.subscriptions.get_mut(&subscription.id) {
            Some(existing) => {
                *existing = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", subscription.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.state.read().await.subscriptions.get(id).cloned())
    }

    async fn find_latest_for_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .values()
            .filter(|s| s.user_id == *user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn find_active_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .values()
            .filter(|s| s.user_id == *user_id && s.is_entitled(now))
            .max_by_key(|s| s.end_date)
            .cloned())
    }
}

#[async_trait]
impl PlanRepository for InMemoryStore {
    async fn insert(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        self.state.write().await.plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.plans.get_mut(&plan.id) {
            Some(existing) => {
                *existing = plan.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PlanNotFound,
                format!("Subscription plan not found: {}", plan.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self.state.read().await.plans.get(id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let state = self.state.read().await;
        let mut plans: Vec<SubscriptionPlan> = state
            .plans
            .values()
            .filter(|p| include_inactive || p.active)
            .cloned()
            .collect();
        plans.sort_by_key(|p| p.price);
        Ok(plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commerce::{PaymentPurpose, Purchase};

    fn pending_payment(user_id: UserId, item_id: ContentId) -> Payment {
        Payment::pending(
            PaymentId::new(),
            user_id,
            9_900,
            "INR",
            "order_mem_1",
            PaymentPurpose::content(ContentKind::Blog, item_id),
        )
    }

    fn confirmation() -> GatewayConfirmation {
        GatewayConfirmation {
            gateway_payment_id: "pay_1".to_string(),
            signature: "sig".to_string(),
        }
    }

    #[tokio::test]
    async fn complete_grants_purchase_once() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();
        let item_id = ContentId::new();
        let payment = pending_payment(user_id, item_id);
        PaymentRepository::insert(&store, &payment).await.unwrap();

        let grant = Grant::Purchase(Purchase::new(user_id, ContentKind::Blog, item_id, payment.id));
        let first = store.complete(&payment.id, confirmation(), grant.clone()).await.unwrap();
        let second = store.complete(&payment.id, confirmation(), grant).await.unwrap();

        assert_eq!(first, Completion::Completed);
        assert_eq!(second, Completion::AlreadyCompleted);
        assert_eq!(store.purchase_count().await, 1);
        assert!(store.has_purchase(&user_id, ContentKind::Blog, &item_id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_purchase_from_second_payment_is_ignored() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();
        let item_id = ContentId::new();

        for _ in 0..2 {
            let payment = pending_payment(user_id, item_id);
            PaymentRepository::insert(&store, &payment).await.unwrap();
            let grant = Grant::Purchase(Purchase::new(user_id, ContentKind::Blog, item_id, payment.id));
            let outcome = store.complete(&payment.id, confirmation(), grant).await.unwrap();
            assert_eq!(outcome, Completion::Completed);
        }

        assert_eq!(store.purchase_count().await, 1);
    }

    #[tokio::test]
    async fn mark_failed_only_moves_pending() {
        let store = InMemoryStore::new();
        let payment = pending_payment(UserId::new(), ContentId::new());
        PaymentRepository::insert(&store, &payment).await.unwrap();

        assert!(store.mark_failed(&payment.id).await.unwrap());
        assert!(!store.mark_failed(&payment.id).await.unwrap());

        let grant = Grant::Purchase(Purchase::new(
            payment.user_id,
            ContentKind::Blog,
            ContentId::new(),
            payment.id,
        ));
        let outcome = store.complete(&payment.id, confirmation(), grant).await.unwrap();
        assert_eq!(outcome, Completion::AlreadyCompleted);
    }

    #[tokio::test]
    async fn plans_list_cheapest_first_and_hide_inactive() {
        let store = InMemoryStore::new();
        let yearly = SubscriptionPlan::create("Yearly", 1999, 365).unwrap();
        let mut monthly = SubscriptionPlan::create("Monthly", 199, 30).unwrap();
        PlanRepository::insert(&store, &yearly).await.unwrap();
        PlanRepository::insert(&store, &monthly).await.unwrap();

        let plans = PlanRepository::list(&store, false).await.unwrap();
        assert_eq!(plans[0].name, "Monthly");

        monthly.deactivate();
        PlanRepository::update(&store, &monthly).await.unwrap();
        assert_eq!(PlanRepository::list(&store, false).await.unwrap().len(), 1);
        assert_eq!(PlanRepository::list(&store, true).await.unwrap().len(), 2);
    }

    fn subscription_payment(subscription: &Subscription) -> Payment {
        Payment::pending(
            PaymentId::new(),
            subscription.user_id,
            19_900,
            "INR",
            "order_mem_sub",
            PaymentPurpose::Subscription {
                plan_id: subscription.plan_id,
                subscription_id: subscription.id,
            },
        )
    }

    #[tokio::test]
    async fn activation_supersedes_running_subscription() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();
        let plan_id = PlanId::new();
        let first = Subscription::pending(user_id, plan_id, 30);
        let second = Subscription::pending(user_id, plan_id, 30);
        let mut grants = Vec::new();
        for sub in [&first, &second] {
            let payment = subscription_payment(sub);
            store.insert_subscription_checkout(&payment, sub).await.unwrap();
            grants.push((payment.id, sub.id));
        }

        let now = Timestamp::now();
        for (payment_id, subscription_id) in grants {
            let grant = Grant::ActivateSubscription {
                subscription_id,
                start_date: now,
                end_date: now.add_days(30),
            };
            store.complete(&payment_id, confirmation(), grant).await.unwrap();
        }

        let first = SubscriptionRepository::find_by_id(&store, &first.id).await.unwrap().unwrap();
        let second = SubscriptionRepository::find_by_id(&store, &second.id).await.unwrap().unwrap();
        assert_eq!(first.status, SubscriptionStatus::Expired);
        assert_eq!(second.status, SubscriptionStatus::Active);
        assert_eq!(second.start_date, now);
        assert_eq!(second.end_date, now.add_days(60));
    }

    #[tokio::test]
    async fn other_users_subscriptions_are_untouched() {
        let store = InMemoryStore::new();
        let plan_id = PlanId::new();
        let mut theirs = Subscription::pending(UserId::new(), plan_id, 30);
        theirs.activate(30, Timestamp::now()).unwrap();
        SubscriptionRepository::insert(&store, &theirs).await.unwrap();

        let mine = Subscription::pending(UserId::new(), plan_id, 30);
        let payment = subscription_payment(&mine);
        store.insert_subscription_checkout(&payment, &mine).await.unwrap();
        let now = Timestamp::now();
        store
            .complete(
                &payment.id,
                confirmation(),
                Grant::ActivateSubscription {
                    subscription_id: mine.id,
                    start_date: now,
                    end_date: now.add_days(30),
                },
            )
            .await
            .unwrap();

        let theirs = SubscriptionRepository::find_by_id(&store, &theirs.id).await.unwrap().unwrap();
        assert_eq!(theirs.status, SubscriptionStatus::Active);
    }
}
