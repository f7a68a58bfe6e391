//! HTTP handlers for comments and bookmarks.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;

use crate::application::handlers::engagement::{CreateCommentCommand, ListCommentsQuery, ToggleBookmarkCommand};

use super::super::error::{parse_id, ApiError};
use super::super::middleware::{OptionalAuth, RequireAuth};
use super::super::state::AppState;
use super::dto::{parse_kind, BookmarkResponse, BookmarkToggleResponse, CommentResponse, CreateCommentRequest};

/// GET /api/content/:kind/:item_id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path((kind, item_id)): Path<(String, String)>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state
        .list_comments_handler()
        .handle(ListCommentsQuery {
            kind: parse_kind(&kind)?,
            item_id: parse_id(&item_id, "item id")?,
            viewer,
        })
        .await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// POST /api/content/:kind/:item_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((kind, item_id)): Path<(String, String)>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = state
        .create_comment_handler()
        .handle(CreateCommentCommand {
            user,
            kind: parse_kind(&kind)?,
            item_id: parse_id(&item_id, "item id")?,
            body: request.body,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_comment_handler()
        .handle(&user, parse_id(&id, "comment id")?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/content/:kind/:item_id/bookmark
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((kind, item_id)): Path<(String, String)>,
) -> Result<Json<BookmarkToggleResponse>, ApiError> {
    let bookmarked = state
        .toggle_bookmark_handler()
        .handle(ToggleBookmarkCommand {
            user,
            kind: parse_kind(&kind)?,
            item_id: parse_id(&item_id, "item id")?,
        })
        .await?;
    Ok(Json(BookmarkToggleResponse { bookmarked }))
}

/// GET /api/bookmarks
pub async fn list_bookmarks(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<BookmarkResponse>>, ApiError> {
    let bookmarks = state.list_bookmarks_handler().handle(&user).await?;
    Ok(Json(bookmarks.iter().map(BookmarkResponse::from).collect()))
}
