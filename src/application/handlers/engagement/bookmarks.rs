//! Bookmark handlers.

use std::sync::Arc;

use crate::application::handlers::content::{content_not_found, is_visible_to};
use crate::domain::content::{ContentItem, ContentKind};
use crate::domain::engagement::Bookmark;
use crate::domain::foundation::{AuthenticatedUser, ContentId, DomainError};
use crate::ports::{BookmarkRepository, ContentRepository};

#[derive(Debug, Clone)]
pub struct ToggleBookmarkCommand {
    pub user: AuthenticatedUser,
    pub kind: ContentKind,
    pub item_id: ContentId,
}

pub struct ToggleBookmarkHandler {
    content: Arc<dyn ContentRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
}

impl ToggleBookmarkHandler {
    pub fn new(content: Arc<dyn ContentRepository>, bookmarks: Arc<dyn BookmarkRepository>) -> Self {
        Self { content, bookmarks }
    }

    /// Returns whether the item is bookmarked afterwards.
    pub async fn handle(&self, cmd: ToggleBookmarkCommand) -> Result<bool, DomainError> {
        let item = self
            .content
            .find_by_id(cmd.kind, &cmd.item_id)
            .await?
            .filter(|item| is_visible_to(item, Some(&cmd.user)))
            .ok_or_else(|| content_not_found(cmd.kind, cmd.item_id))?;

        let bookmarked = self
            .bookmarks
            .toggle(&Bookmark::new(cmd.user.id, item.kind, item.id))
            .await?;
        tracing::debug!(item_id = %item.id, user_id = %cmd.user.id, bookmarked, "Bookmark toggled");
        Ok(bookmarked)
    }
}

/// A bookmark joined with its item.
#[derive(Debug, Clone)]
pub struct BookmarkedItem {
    pub bookmark: Bookmark,
    pub item: ContentItem,
}

pub struct ListBookmarksHandler {
    content: Arc<dyn ContentRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
}

impl ListBookmarksHandler {
    pub fn new(content: Arc<dyn ContentRepository>, bookmarks: Arc<dyn BookmarkRepository>) -> Self {
        Self { content, bookmarks }
    }

    /// Newest first. Bookmarks of deleted or unpublished items are skipped.
    pub async fn handle(&self, user: &AuthenticatedUser) -> Result<Vec<BookmarkedItem>, DomainError> {
        let bookmarks = self.bookmarks.list_for_user(&user.id).await?;
        let mut items = Vec::with_capacity(bookmarks.len());
        for bookmark in bookmarks {
            let item = self.content.find_by_id(bookmark.kind, &bookmark.item_id).await?;
            if let Some(item) = item.filter(|item| is_visible_to(item, Some(user))) {
                items.push(BookmarkedItem { bookmark, item });
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::account::User;
    use crate::domain::content::ContentDraft;
    use crate::domain::foundation::{ErrorCode, Role};

    async fn item(store: &InMemoryStore, title: &str, published: bool) -> ContentItem {
        let item = ContentItem::create(
            ContentKind::Blog,
            ContentDraft {
                title: title.to_string(),
                body: "body".to_string(),
                published,
                ..Default::default()
            },
            crate::domain::foundation::UserId::new(),
        )
        .unwrap();
        ContentRepository::insert(store, &item).await.unwrap();
        item
    }

    fn reader() -> AuthenticatedUser {
        User::new("reader@example.com", None, Role::User).to_authenticated()
    }

    #[tokio::test]
    async fn toggle_then_list() {
        let store = InMemoryStore::new();
        let first = item(&store, "First", true).await;
        let second = item(&store, "Second", true).await;
        let user = reader();
        let toggle = ToggleBookmarkHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));

        for target in [&first, &second] {
            let on = toggle
                .handle(ToggleBookmarkCommand {
                    user: user.clone(),
                    kind: target.kind,
                    item_id: target.id,
                })
                .await
                .unwrap();
            assert!(on);
        }
        let off = toggle
            .handle(ToggleBookmarkCommand {
                user: user.clone(),
                kind: first.kind,
                item_id: first.id,
            })
            .await
            .unwrap();
        assert!(!off);

        let listed = ListBookmarksHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
            .handle(&user)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].item.id, second.id);
    }

    #[tokio::test]
    async fn cannot_bookmark_hidden_item() {
        let store = InMemoryStore::new();
        let draft = item(&store, "Draft", false).await;

        let err = ToggleBookmarkHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
            .handle(ToggleBookmarkCommand {
                user: reader(),
                kind: draft.kind,
                item_id: draft.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ContentNotFound);
    }
}
