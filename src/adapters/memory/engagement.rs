use async_trait::async_trait;

use crate::domain::content::ContentKind;
use crate::domain::engagement::{Bookmark, Comment};
use crate::domain::foundation::{CommentId, ContentId, DomainError, UserId};
use crate::ports::{BookmarkRepository, CommentRepository};

use super::InMemoryStore;

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), DomainError> {
        self.state.write().await.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        Ok(self.state.read().await.comments.get(id).cloned())
    }

    async fn list_for_item(&self, kind: ContentKind, item_id: &ContentId) -> Result<Vec<Comment>, DomainError> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.kind == kind && c.item_id == *item_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.comments.remove(id).is_some())
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryStore {
    async fn toggle(&self, bookmark: &Bookmark) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let before = state.bookmarks.len();
        state.bookmarks.retain(|b| {
            !(b.user_id == bookmark.user_id && b.kind == bookmark.kind && b.item_id == bookmark.item_id)
        });
        if state.bookmarks.len() < before {
            return Ok(false);
        }
        state.bookmarks.push(bookmark.clone());
        Ok(true)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>, DomainError> {
        let state = self.state.read().await;
        let mut bookmarks: Vec<Bookmark> = state
            .bookmarks
            .iter()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect();
        bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let store = InMemoryStore::new();
        let bookmark = Bookmark::new(UserId::new(), ContentKind::Resource, ContentId::new());

        assert!(store.toggle(&bookmark).await.unwrap());
        assert_eq!(store.list_for_user(&bookmark.user_id).await.unwrap().len(), 1);
        assert!(!store.toggle(&bookmark).await.unwrap());
        assert!(store.list_for_user(&bookmark.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_are_listed_per_item() {
        let store = InMemoryStore::new();
        let item_id = ContentId::new();
        let user_id = UserId::new();
        let first = Comment::new(ContentKind::Blog, item_id, user_id, "first").unwrap();
        let other = Comment::new(ContentKind::Blog, ContentId::new(), user_id, "other").unwrap();
        CommentRepository::insert(&store, &first).await.unwrap();
        CommentRepository::insert(&store, &other).await.unwrap();

        let listed = store.list_for_item(ContentKind::Blog, &item_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].body, "first");

        assert!(CommentRepository::delete(&store, &first.id).await.unwrap());
        assert!(!CommentRepository::delete(&store, &first.id).await.unwrap());
    }
}
