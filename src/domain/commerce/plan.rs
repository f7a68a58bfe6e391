//! Subscription plan offered by the site.

use serde::{Deserialize, Serialize};

use crate::domain::content::MAX_PRICE;
use crate::domain::foundation::{PlanId, Timestamp, ValidationError};

const MAX_DURATION_DAYS: i64 = 3650;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    pub name: String,
    /// Price in whole major units.
    pub price: i64,
    pub duration_days: i64,
    pub active: bool,
    pub created_at: Timestamp,
}

impl SubscriptionPlan {
    pub fn create(name: &str, price: i64, duration_days: i64) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if !(1..=MAX_PRICE).contains(&price) {
            return Err(ValidationError::out_of_range("price", 1, MAX_PRICE, price));
        }
        if !(1..=MAX_DURATION_DAYS).contains(&duration_days) {
            return Err(ValidationError::out_of_range(
                "durationDays",
                1,
                MAX_DURATION_DAYS,
                duration_days,
            ));
        }
        Ok(Self {
            id: PlanId::new(),
            name: name.to_string(),
            price,
            duration_days,
            active: true,
            created_at: Timestamp::now(),
        })
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_validates_fields() {
        assert!(SubscriptionPlan::create("", 100, 30).is_err());
        assert!(SubscriptionPlan::create("Monthly", 0, 30).is_err());
        assert!(SubscriptionPlan::create("Monthly", 100, 0).is_err());

        let plan = SubscriptionPlan::create(" Monthly ", 199, 30).unwrap();
        assert_eq!(plan.name, "Monthly");
        assert!(plan.active);
    }

    #[test]
    fn deactivate_clears_active_flag() {
        let mut plan = SubscriptionPlan::create("Yearly", 1999, 365).unwrap();
        plan.deactivate();
        assert!(!plan.active);
    }
}
