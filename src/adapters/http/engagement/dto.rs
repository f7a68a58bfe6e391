//! HTTP DTOs for comments and bookmarks.

use serde::{Deserialize, Serialize};

use crate::application::handlers::engagement::{BookmarkedItem, CommentView};
use crate::domain::content::ContentKind;
use crate::domain::foundation::{CommentId, ContentId, Timestamp, UserId};

use super::super::content::dto::ContentSummary;
use super::super::error::ApiError;

/// Accepts `blog`, `blogs`, `resource` or `resources` in any case.
pub fn parse_kind(segment: &str) -> Result<ContentKind, ApiError> {
    let singular = segment.strip_suffix('s').unwrap_or(segment);
    ContentKind::parse(singular)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown content type '{}'", segment)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: CommentId,
    pub kind: ContentKind,
    pub item_id: ContentId,
    pub user_id: UserId,
    pub author_name: Option<String>,
    pub body: String,
    pub created_at: Timestamp,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id,
            kind: view.comment.kind,
            item_id: view.comment.item_id,
            user_id: view.comment.user_id,
            author_name: view.author_name,
            body: view.comment.body,
            created_at: view.comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkToggleResponse {
    pub bookmarked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub bookmarked_at: Timestamp,
    pub item: ContentSummary,
}

impl From<&BookmarkedItem> for BookmarkResponse {
    fn from(entry: &BookmarkedItem) -> Self {
        Self {
            bookmarked_at: entry.bookmark.created_at,
            item: ContentSummary::from(&entry.item),
        }
    }
}
