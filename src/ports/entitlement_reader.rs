//! Entitlement reader port (read side).
//!
//! Answers the two ownership questions the entitlement resolver needs. Kept
//! separate from the write-side repositories so the hot read path can be
//! served by a single indexed lookup.

use async_trait::async_trait;

use crate::domain::content::ContentKind;
use crate::domain::foundation::{ContentId, DomainError, Timestamp, UserId};

#[async_trait]
pub trait EntitlementReader: Send + Sync {
    /// True if a purchase row exists for (user, item).
    async fn has_purchase(
        &self,
        user_id: &UserId,
        kind: ContentKind,
        item_id: &ContentId,
    ) -> Result<bool, DomainError>;

    /// True if the user has an ACTIVE subscription with `end_date >= now`.
    async fn has_active_subscription(&self, user_id: &UserId, now: Timestamp) -> Result<bool, DomainError>;
}
