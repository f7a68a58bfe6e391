//! Subscription plan handlers.
//!
//! The public catalogue lists active plans only. Admins create plans and
//! deactivate them; plans are never deleted because payments reference them.

use std::sync::Arc;

use crate::domain::commerce::{CommerceError, SubscriptionPlan};
use crate::domain::foundation::PlanId;
use crate::ports::PlanRepository;

#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub name: String,
    pub price: i64,
    pub duration_days: i64,
}

pub struct CreatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl CreatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, cmd: CreatePlanCommand) -> Result<SubscriptionPlan, CommerceError> {
        let plan = SubscriptionPlan::create(&cmd.name, cmd.price, cmd.duration_days)?;
        self.plans.insert(&plan).await?;
        tracing::info!(plan_id = %plan.id, price = plan.price, "Subscription plan created");
        Ok(plan)
    }
}

pub struct ListPlansHandler {
    plans: Arc<dyn PlanRepository>,
}

impl ListPlansHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, include_inactive: bool) -> Result<Vec<SubscriptionPlan>, CommerceError> {
        Ok(self.plans.list(include_inactive).await?)
    }
}

pub struct DeactivatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl DeactivatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    /// Idempotent.
    pub async fn handle(&self, plan_id: PlanId) -> Result<SubscriptionPlan, CommerceError> {
        let mut plan = self
            .plans
            .find_by_id(&plan_id)
            .await?
            .ok_or_else(|| CommerceError::plan_not_found(plan_id))?;
        if plan.active {
            plan.deactivate();
            self.plans.update(&plan).await?;
            tracing::info!(plan_id = %plan.id, "Subscription plan deactivated");
        }
        Ok(plan)
    }
}
