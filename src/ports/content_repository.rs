//! Content repository port.
//!
//! Blogs and resources share one contract; every call is scoped by
//! [`ContentKind`] so that slugs are unique per kind.

use async_trait::async_trait;

use crate::domain::content::{ContentItem, ContentKind, Slug};
use crate::domain::foundation::{ContentId, DomainError};

/// Maximum page size for listings.
pub const MAX_PER_PAGE: u32 = 50;

/// Listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub kind: ContentKind,
    pub tag: Option<String>,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    pub include_unpublished: bool,
}

impl ContentQuery {
    pub fn published(kind: ContentKind) -> Self {
        Self {
            kind,
            tag: None,
            page: 1,
            per_page: 10,
            include_unpublished: false,
        }
    }

    /// Clamps paging to `1..` and `1..=MAX_PER_PAGE`.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        self.tag = self
            .tag
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        self
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// One page of results, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// # Errors
    ///
    /// - `SlugTaken` if the slug is already used for this kind
    async fn insert(&self, item: &ContentItem) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ContentNotFound` if the item doesn't exist
    /// - `SlugTaken` if the new slug collides
    async fn update(&self, item: &ContentItem) -> Result<(), DomainError>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, kind: ContentKind, id: &ContentId) -> Result<bool, DomainError>;

    async fn find_by_id(&self, kind: ContentKind, id: &ContentId) -> Result<Option<ContentItem>, DomainError>;

    async fn find_by_slug(&self, kind: ContentKind, slug: &Slug) -> Result<Option<ContentItem>, DomainError>;

    async fn list(&self, query: &ContentQuery) -> Result<Page<ContentItem>, DomainError>;
}
