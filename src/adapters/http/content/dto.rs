//! HTTP DTOs for content endpoints.
//!
//! Listing entries never carry the body. Single-item responses carry it only
//! when the viewer is entitled; otherwise `content` and `downloadUrl` are null
//! and `hasAccess` is false so the client can render a paywall.

use serde::{Deserialize, Deserializer, Serialize};

use crate::application::handlers::content::ContentView;
use crate::domain::content::{AccessType, ContentDraft, ContentItem, ContentKind, ContentPatch};
use crate::domain::foundation::{ContentId, Timestamp, UserId};
use crate::ports::Page;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string for listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContentParams {
    pub page: Option<u32>,
    #[serde(alias = "per_page")]
    pub per_page: Option<u32>,
    pub tag: Option<String>,
    /// Only honoured for admins.
    #[serde(default, alias = "include_unpublished")]
    pub include_unpublished: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub access_type: Option<AccessType>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl From<CreateContentRequest> for ContentDraft {
    fn from(req: CreateContentRequest) -> Self {
        ContentDraft {
            title: req.title,
            slug: req.slug,
            excerpt: req.excerpt,
            body: req.content,
            access_type: req.access_type,
            price: req.price,
            tags: req.tags,
            cover_image: req.cover_image,
            download_url: req.download_url,
            published: req.published,
        }
    }
}

/// Partial update. For nullable fields, an absent key leaves the value alone
/// and an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub excerpt: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub access_type: Option<AccessType>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<i64>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub download_url: Option<Option<String>>,
    #[serde(default)]
    pub published: Option<bool>,
}

/// Maps a present key (including `null`) to `Some`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateContentRequest> for ContentPatch {
    fn from(req: UpdateContentRequest) -> Self {
        ContentPatch {
            title: req.title,
            slug: req.slug,
            excerpt: req.excerpt,
            body: req.content,
            access_type: req.access_type,
            price: req.price,
            tags: req.tags,
            cover_image: req.cover_image,
            download_url: req.download_url,
            published: req.published,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Listing entry; never includes the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: ContentId,
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub access_type: AccessType,
    pub price: Option<i64>,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&ContentItem> for ContentSummary {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            title: item.title.clone(),
            slug: item.slug.as_str().to_string(),
            excerpt: item.excerpt.clone(),
            access_type: item.access_type,
            price: item.price,
            tags: item.tags.clone(),
            cover_image: item.cover_image.clone(),
            published: item.published,
            author_id: item.author_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentListResponse {
    pub items: Vec<ContentSummary>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl From<Page<ContentItem>> for ContentListResponse {
    fn from(page: Page<ContentItem>) -> Self {
        Self {
            items: page.items.iter().map(ContentSummary::from).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    #[serde(flatten)]
    pub summary: ContentSummary,
    pub content: Option<String>,
    pub download_url: Option<String>,
    pub has_access: bool,
}

impl ContentResponse {
    /// Admin view: always the full item.
    pub fn full(item: &ContentItem) -> Self {
        Self {
            summary: ContentSummary::from(item),
            content: Some(item.body.clone()),
            download_url: item.download_url.clone(),
            has_access: true,
        }
    }
}

impl From<&ContentView> for ContentResponse {
    fn from(view: &ContentView) -> Self {
        Self {
            summary: ContentSummary::from(&view.item),
            content: view.body().map(str::to_string),
            download_url: view.download_url().map(str::to_string),
            has_access: view.has_access(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_null_from_absent() {
        let req: UpdateContentRequest =
            serde_json::from_str(r#"{"coverImage": null, "title": "New"}"#).unwrap();
        assert_eq!(req.cover_image, Some(None));
        assert_eq!(req.excerpt, None);
        assert_eq!(req.title.as_deref(), Some("New"));
    }

    #[test]
    fn create_request_maps_content_to_body() {
        let req: CreateContentRequest = serde_json::from_str(
            r#"{"title": "Hello", "content": "<p>hi</p>", "accessType": "PAID", "price": 99}"#,
        )
        .unwrap();
        let draft = ContentDraft::from(req);
        assert_eq!(draft.body, "<p>hi</p>");
        assert_eq!(draft.access_type, Some(AccessType::Paid));
        assert!(!draft.published);
    }

    #[test]
    fn list_params_accept_both_spellings() {
        let camel: ListContentParams = serde_json::from_str(r#"{"perPage": 5}"#).unwrap();
        let snake: ListContentParams = serde_json::from_str(r#"{"per_page": 5}"#).unwrap();
        assert_eq!(camel.per_page, Some(5));
        assert_eq!(snake.per_page, Some(5));
    }
}
