//! ListContentHandler - Query handler for paged listings.

use std::sync::Arc;

use crate::domain::content::{ContentItem, ContentKind};
use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::ports::{ContentQuery, ContentRepository, Page};

#[derive(Debug, Clone)]
pub struct ListContentQuery {
    pub kind: ContentKind,
    pub tag: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Honoured for admins only.
    pub include_unpublished: bool,
    pub viewer: Option<AuthenticatedUser>,
}

pub struct ListContentHandler {
    content: Arc<dyn ContentRepository>,
}

impl ListContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    pub async fn handle(&self, query: ListContentQuery) -> Result<Page<ContentItem>, DomainError> {
        let is_admin = query.viewer.as_ref().is_some_and(|v| v.is_admin());
        let defaults = ContentQuery::published(query.kind);
        let repo_query = ContentQuery {
            kind: query.kind,
            tag: query.tag,
            page: query.page.unwrap_or(defaults.page),
            per_page: query.per_page.unwrap_or(defaults.per_page),
            include_unpublished: query.include_unpublished && is_admin,
        }
        .normalized();

        self.content.list(&repo_query).await
    }
}
