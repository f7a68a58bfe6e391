//! One-time purchase of a content item.

use serde::{Deserialize, Serialize};

use crate::domain::content::ContentKind;
use crate::domain::foundation::{ContentId, PaymentId, PurchaseId, Timestamp, UserId};

/// Proof of payment for a single (user, item) pair. Unique per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub kind: ContentKind,
    pub item_id: ContentId,
    pub payment_id: PaymentId,
    pub created_at: Timestamp,
}

impl Purchase {
    pub fn new(user_id: UserId, kind: ContentKind, item_id: ContentId, payment_id: PaymentId) -> Self {
        Self {
            id: PurchaseId::new(),
            user_id,
            kind,
            item_id,
            payment_id,
            created_at: Timestamp::now(),
        }
    }
}
