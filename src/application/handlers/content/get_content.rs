//! GetContentHandler - Query handler for viewing a single item by slug.
//!
//! Every full-content read goes through [`check_access`], which is the only
//! place the entitlement rules are applied.

use std::sync::Arc;

use crate::domain::content::{
    required_fact, resolve_access, Access, ContentItem, ContentKind, EntitlementFacts, Requirement, Slug,
};
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Timestamp};
use crate::ports::{ContentRepository, EntitlementReader};

/// Query for an item by slug.
#[derive(Debug, Clone)]
pub struct GetContentQuery {
    pub kind: ContentKind,
    pub slug: String,
    pub viewer: Option<AuthenticatedUser>,
}

/// An item together with the viewer's access to it.
#[derive(Debug, Clone)]
pub struct ContentView {
    pub item: ContentItem,
    pub access: Access,
}

impl ContentView {
    pub fn has_access(&self) -> bool {
        self.access.is_full()
    }

    /// Full body, or `None` for a preview.
    pub fn body(&self) -> Option<&str> {
        self.has_access().then_some(self.item.body.as_str())
    }

    /// Download link, or `None` for a preview.
    pub fn download_url(&self) -> Option<&str> {
        if self.has_access() {
            self.item.download_url.as_deref()
        } else {
            None
        }
    }
}

/// Loads only the fact the decision needs, then resolves access.
pub async fn check_access(
    reader: &dyn EntitlementReader,
    item: &ContentItem,
    viewer: Option<&AuthenticatedUser>,
) -> Result<Access, DomainError> {
    let facts = match (required_fact(item.access_type, viewer), viewer) {
        (Some(Requirement::Purchase), Some(user)) => EntitlementFacts {
            has_purchase: reader.has_purchase(&user.id, item.kind, &item.id).await?,
            ..EntitlementFacts::none()
        },
        (Some(Requirement::ActiveSubscription), Some(user)) => EntitlementFacts {
            has_active_subscription: reader.has_active_subscription(&user.id, Timestamp::now()).await?,
            ..EntitlementFacts::none()
        },
        _ => EntitlementFacts::none(),
    };
    Ok(resolve_access(item.access_type, viewer, facts))
}

/// Unpublished items exist only for admins.
pub fn is_visible_to(item: &ContentItem, viewer: Option<&AuthenticatedUser>) -> bool {
    item.published || viewer.is_some_and(|v| v.is_admin())
}

pub(crate) fn content_not_found(kind: ContentKind, what: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::ContentNotFound,
        format!("No {} found for '{}'", kind.label(), what),
    )
}

pub struct GetContentHandler {
    content: Arc<dyn ContentRepository>,
    entitlements: Arc<dyn EntitlementReader>,
}

impl GetContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>, entitlements: Arc<dyn EntitlementReader>) -> Self {
        Self { content, entitlements }
    }

    pub async fn handle(&self, query: GetContentQuery) -> Result<ContentView, DomainError> {
        let slug = Slug::parse(query.slug.as_str()).map_err(|_| content_not_found(query.kind, &query.slug))?;
        let item = self
            .content
            .find_by_slug(query.kind, &slug)
            .await?
            .filter(|item| is_visible_to(item, query.viewer.as_ref()))
            .ok_or_else(|| content_not_found(query.kind, &query.slug))?;

        let access = check_access(self.entitlements.as_ref(), &item, query.viewer.as_ref()).await?;

        tracing::debug!(
            item_id = %item.id,
            access_type = %item.access_type,
            full_access = access.is_full(),
            "Resolved content access"
        );

        Ok(ContentView { item, access })
    }
}
