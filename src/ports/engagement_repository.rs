//! Comment and bookmark repository ports.

use async_trait::async_trait;

use crate::domain::content::ContentKind;
use crate::domain::engagement::{Bookmark, Comment};
use crate::domain::foundation::{CommentId, ContentId, DomainError, UserId};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError>;

    /// Oldest first.
    async fn list_for_item(&self, kind: ContentKind, item_id: &ContentId) -> Result<Vec<Comment>, DomainError>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, id: &CommentId) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Adds the bookmark if absent, removes it if present.
    ///
    /// Returns true when the item is bookmarked after the call.
    async fn toggle(&self, bookmark: &Bookmark) -> Result<bool, DomainError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>, DomainError>;
}
