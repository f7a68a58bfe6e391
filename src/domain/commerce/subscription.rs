//! Recurring subscription.
//!
//! # State Machine
//!
//! ```text
//! PENDING --(payment verified)--> ACTIVE --(cancel)--> CANCELLED
//!                                    |
//!                                    +--(now > end_date)--> EXPIRED
//!                                    +--(newer one activated)--> EXPIRED
//! ```
//!
//! Expiry is evaluated lazily; a stored ACTIVE row past its end date is
//! reported as EXPIRED and grants nothing.
//!
//! A user holds at most one ACTIVE subscription. Activating another one
//! supersedes the current one and carries its unused time over (see
//! [`carry_over`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PlanId, SubscriptionId, Timestamp, UserId};

use super::CommerceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "PENDING",
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Cancelled => "CANCELLED",
            SubscriptionStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(SubscriptionStatus::Pending),
            "ACTIVE" => Some(SubscriptionStatus::Active),
            "CANCELLED" => Some(SubscriptionStatus::Cancelled),
            "EXPIRED" => Some(SubscriptionStatus::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
}

impl Subscription {
    /// Creates an unpaid subscription at order time.
    pub fn pending(user_id: UserId, plan_id: PlanId, duration_days: i64) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            user_id,
            plan_id,
            status: SubscriptionStatus::Pending,
            start_date: now,
            end_date: now.add_days(duration_days),
            created_at: now,
        }
    }

    /// Activates the subscription starting at `now`.
    pub fn activate(&mut self, duration_days: i64, now: Timestamp) -> Result<(), CommerceError> {
        if self.status != SubscriptionStatus::Pending {
            return Err(CommerceError::invalid_state(self.status.as_str(), "activate subscription"));
        }
        self.status = SubscriptionStatus::Active;
        self.start_date = now;
        self.end_date = now.add_days(duration_days);
        Ok(())
    }

    pub fn cancel(&mut self, now: Timestamp) -> Result<(), CommerceError> {
        match self.effective_status(now) {
            SubscriptionStatus::Active => {
                self.status = SubscriptionStatus::Cancelled;
                Ok(())
            }
            other => Err(CommerceError::invalid_state(other.as_str(), "cancel subscription")),
        }
    }

    /// Retires an ACTIVE subscription replaced by a newer activation.
    pub fn supersede(&mut self) {
        if self.status == SubscriptionStatus::Active {
            self.status = SubscriptionStatus::Expired;
        }
    }

    /// Status with lazy expiry applied.
    pub fn effective_status(&self, now: Timestamp) -> SubscriptionStatus {
        if self.status == SubscriptionStatus::Active && now.is_after(&self.end_date) {
            SubscriptionStatus::Expired
        } else {
            self.status
        }
    }

    /// ACTIVE and `now <= end_date`.
    pub fn is_entitled(&self, now: Timestamp) -> bool {
        self.effective_status(now) == SubscriptionStatus::Active
    }
}

/// End date for a subscription activated over `start..end` that replaces one
/// running until `replaced_end`. Time left on the replaced subscription is
/// appended.
pub fn carry_over(start: Timestamp, end: Timestamp, replaced_end: Option<Timestamp>) -> Timestamp {
    match replaced_end {
        Some(replaced) if replaced.is_after(&start) => {
            let remaining = *replaced.as_datetime() - *start.as_datetime();
            Timestamp::from_datetime(*end.as_datetime() + remaining)
        }
        _ => end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(duration_days: i64, now: Timestamp) -> Subscription {
        let mut sub = Subscription::pending(UserId::new(), PlanId::new(), duration_days);
        sub.activate(duration_days, now).unwrap();
        sub
    }

    #[test]
    fn pending_subscription_grants_nothing() {
        let sub = Subscription::pending(UserId::new(), PlanId::new(), 30);
        assert!(!sub.is_entitled(Timestamp::now()));
    }

    #[test]
    fn activate_sets_window_from_now() {
        let now = Timestamp::now();
        let sub = active(30, now);
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.start_date, now);
        assert_eq!(sub.end_date, now.add_days(30));
        assert!(sub.is_entitled(now));
    }

    #[test]
    fn activate_twice_fails() {
        let now = Timestamp::now();
        let mut sub = active(30, now);
        assert!(sub.activate(30, now).is_err());
    }

    #[test]
    fn entitlement_ends_after_end_date() {
        let start = Timestamp::now().minus_days(31);
        let sub = active(30, start);
        let now = Timestamp::now();
        assert!(!sub.is_entitled(now));
        assert_eq!(sub.effective_status(now), SubscriptionStatus::Expired);
    }

    #[test]
    fn entitled_on_end_date_boundary() {
        let now = Timestamp::now();
        let sub = active(30, now);
        assert!(sub.is_entitled(sub.end_date));
    }

    #[test]
    fn cancel_revokes_access() {
        let now = Timestamp::now();
        let mut sub = active(30, now);
        sub.cancel(now).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert!(!sub.is_entitled(now));
        assert!(sub.cancel(now).is_err());
    }

    #[test]
    fn expired_subscription_cannot_be_cancelled() {
        let mut sub = active(30, Timestamp::now().minus_days(60));
        assert!(sub.cancel(Timestamp::now()).is_err());
    }

    #[test]
    fn supersede_retires_active_only() {
        let now = Timestamp::now();
        let mut current = active(30, now);
        current.supersede();
        assert_eq!(current.status, SubscriptionStatus::Expired);
        assert!(!current.is_entitled(now));

        let mut pending = Subscription::pending(UserId::new(), PlanId::new(), 30);
        pending.supersede();
        assert_eq!(pending.status, SubscriptionStatus::Pending);
    }

    #[test]
    fn carry_over_appends_remaining_time() {
        let start = Timestamp::now();
        let end = start.add_days(30);
        assert_eq!(carry_over(start, end, Some(start.add_days(10))), start.add_days(40));
    }

    #[test]
    fn carry_over_ignores_lapsed_or_missing_subscription() {
        let start = Timestamp::now();
        let end = start.add_days(30);
        assert_eq!(carry_over(start, end, None), end);
        assert_eq!(carry_over(start, end, Some(start.minus_days(3))), end);
        assert_eq!(carry_over(start, end, Some(start)), end);
    }
}
