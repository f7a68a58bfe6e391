//! Entitlement resolution.
//!
//! Decides whether a viewer sees an item in full or as a preview. The decision
//! is pure: ownership facts are gathered by the caller, and only when
//! [`required_fact`] says a lookup is needed.

use serde::Serialize;

use crate::domain::foundation::AuthenticatedUser;

use super::AccessType;

/// Result of an entitlement decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Access {
    Full,
    Preview,
}

impl Access {
    pub fn is_full(&self) -> bool {
        matches!(self, Access::Full)
    }
}

/// The single stored fact an access decision may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A purchase row for (viewer, item).
    Purchase,
    /// An ACTIVE, non-expired subscription for the viewer.
    ActiveSubscription,
}

/// Ownership facts loaded for one viewer and one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntitlementFacts {
    pub has_purchase: bool,
    pub has_active_subscription: bool,
}

impl EntitlementFacts {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn purchased() -> Self {
        Self {
            has_purchase: true,
            ..Self::default()
        }
    }

    pub fn subscribed() -> Self {
        Self {
            has_active_subscription: true,
            ..Self::default()
        }
    }
}

/// Returns the fact that must be loaded before calling [`resolve_access`].
///
/// `None` means the decision is already known: FREE items, admins and
/// anonymous viewers never need a lookup.
pub fn required_fact(access_type: AccessType, viewer: Option<&AuthenticatedUser>) -> Option<Requirement> {
    let viewer = viewer?;
    if viewer.is_admin() {
        return None;
    }
    match access_type {
        AccessType::Free => None,
        AccessType::Paid => Some(Requirement::Purchase),
        AccessType::Subscription => Some(Requirement::ActiveSubscription),
    }
}

/// Decides full vs preview access.
pub fn resolve_access(
    access_type: AccessType,
    viewer: Option<&AuthenticatedUser>,
    facts: EntitlementFacts,
) -> Access {
    if access_type == AccessType::Free {
        return Access::Full;
    }
    let Some(viewer) = viewer else {
        return Access::Preview;
    };
    if viewer.is_admin() {
        return Access::Full;
    }
    let granted = match access_type {
        AccessType::Free => true,
        AccessType::Paid => facts.has_purchase,
        AccessType::Subscription => facts.has_active_subscription,
    };
    if granted {
        Access::Full
    } else {
        Access::Preview
    }
}
