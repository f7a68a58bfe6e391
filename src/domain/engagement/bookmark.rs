//! Bookmarks: a reader's saved items.

use serde::{Deserialize, Serialize};

use crate::domain::content::ContentKind;
use crate::domain::foundation::{ContentId, Timestamp, UserId};

/// Unique per (user, item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub user_id: UserId,
    pub kind: ContentKind,
    pub item_id: ContentId,
    pub created_at: Timestamp,
}

impl Bookmark {
    pub fn new(user_id: UserId, kind: ContentKind, item_id: ContentId) -> Self {
        Self {
            user_id,
            kind,
            item_id,
            created_at: Timestamp::now(),
        }
    }
}
