//! Reader comments on content items.

use serde::{Deserialize, Serialize};

use crate::domain::content::ContentKind;
use crate::domain::foundation::{AuthenticatedUser, CommentId, ContentId, Timestamp, UserId, ValidationError};

/// Maximum comment length in characters.
pub const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub kind: ContentKind,
    pub item_id: ContentId,
    pub user_id: UserId,
    pub body: String,
    pub created_at: Timestamp,
}

impl Comment {
    pub fn new(
        kind: ContentKind,
        item_id: ContentId,
        user_id: UserId,
        body: &str,
    ) -> Result<Self, ValidationError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ValidationError::empty_field("body"));
        }
        let len = body.chars().count();
        if len > MAX_COMMENT_LEN {
            return Err(ValidationError::out_of_range(
                "body",
                1,
                MAX_COMMENT_LEN as i64,
                len as i64,
            ));
        }
        Ok(Self {
            id: CommentId::new(),
            kind,
            item_id,
            user_id,
            body: body.to_string(),
            created_at: Timestamp::now(),
        })
    }

    /// Authors and admins may delete a comment.
    pub fn can_be_deleted_by(&self, user: &AuthenticatedUser) -> bool {
        user.is_admin() || self.user_id == user.id
    }
}
