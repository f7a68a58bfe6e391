use async_trait::async_trait;

use crate::domain::content::{ContentItem, ContentKind, Slug};
use crate::domain::foundation::{ContentId, DomainError, ErrorCode};
use crate::ports::{ContentQuery, ContentRepository, Page};

use super::{InMemoryStore, MemoryState};

fn slug_taken(state: &MemoryState, item: &ContentItem) -> bool {
    state
        .content
        .values()
        .any(|other| other.id != item.id && other.kind == item.kind && other.slug == item.slug)
}

fn slug_taken_error(item: &ContentItem) -> DomainError {
    DomainError::new(
        ErrorCode::SlugTaken,
        format!("A {} with slug '{}' already exists", item.kind.label(), item.slug),
    )
}

#[async_trait]
impl ContentRepository for InMemoryStore {
    async fn insert(&self, item: &ContentItem) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if slug_taken(&state, item) {
            return Err(slug_taken_error(item));
        }
        state.content.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, item: &ContentItem) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.content.contains_key(&item.id) {
            return Err(DomainError::new(
                ErrorCode::ContentNotFound,
                format!("Content not found: {}", item.id),
            ));
        }
        if slug_taken(&state, item) {
            return Err(slug_taken_error(item));
        }
        state.content.insert(item.id, item.clone());
        Ok(())
    }

    async fn delete(&self, kind: ContentKind, id: &ContentId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let matches = state.content.get(id).is_some_and(|item| item.kind == kind);
        if !matches {
            return Ok(false);
        }
        state.content.remove(id);
        state.comments.retain(|_, c| c.item_id != *id);
        state.bookmarks.retain(|b| b.item_id != *id);
        Ok(true)
    }

    async fn find_by_id(&self, kind: ContentKind, id: &ContentId) -> Result<Option<ContentItem>, DomainError> {
        let state = self.state.read().await;
        Ok(state.content.get(id).filter(|item| item.kind == kind).cloned())
    }

    async fn find_by_slug(&self, kind: ContentKind, slug: &Slug) -> Result<Option<ContentItem>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .content
            .values()
            .find(|item| item.kind == kind && item.slug == *slug)
            .cloned())
    }

    async fn list(&self, query: &ContentQuery) -> Result<Page<ContentItem>, DomainError> {
        let state = self.state.read().await;
        let mut matching: Vec<&ContentItem> = state
            .content
            .values()
            .filter(|item| item.kind == query.kind)
            .filter(|item| query.include_unpublished || item.published)
            .filter(|item| match &query.tag {
                Some(tag) => item.tags.iter().any(|t| t == tag),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.per_page as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total,
            page: query.page,
            per_page: query.per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::ContentDraft;
    use crate::domain::foundation::UserId;

    fn item(kind: ContentKind, title: &str, published: bool, tags: &[&str]) -> ContentItem {
        ContentItem::create(
            kind,
            ContentDraft {
                title: title.to_string(),
                body: "body".to_string(),
                published,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
            UserId::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn duplicate_slug_within_kind_is_rejected() {
        let store = InMemoryStore::new();
        store.insert(&item(ContentKind::Blog, "Same Title", true, &[])).await.unwrap();

        let err = store
            .insert(&item(ContentKind::Blog, "Same Title", true, &[]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlugTaken);

        // Other kind may reuse the slug.
        store
            .insert(&item(ContentKind::Resource, "Same Title", true, &[]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_filters_published_and_tag() {
        let store = InMemoryStore::new();
        store.insert(&item(ContentKind::Blog, "One", true, &["rust"])).await.unwrap();
        store.insert(&item(ContentKind::Blog, "Two", true, &["go"])).await.unwrap();
        store.insert(&item(ContentKind::Blog, "Draft", false, &["rust"])).await.unwrap();

        let query = ContentQuery {
            tag: Some("rust".to_string()),
            ..ContentQuery::published(ContentKind::Blog)
        };
        let page = store.list(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "One");

        let all = ContentQuery {
            include_unpublished: true,
            ..ContentQuery::published(ContentKind::Blog)
        };
        assert_eq!(store.list(&all).await.unwrap().total, 3);
    }

    #[tokio::test]
    async fn find_by_id_is_scoped_by_kind() {
        let store = InMemoryStore::new();
        let blog = item(ContentKind::Blog, "Scoped", true, &[]);
        store.insert(&blog).await.unwrap();

        assert!(store.find_by_id(ContentKind::Blog, &blog.id).await.unwrap().is_some());
        assert!(store.find_by_id(ContentKind::Resource, &blog.id).await.unwrap().is_none());
        assert!(!store.delete(ContentKind::Resource, &blog.id).await.unwrap());
        assert!(store.delete(ContentKind::Blog, &blog.id).await.unwrap());
    }
}
