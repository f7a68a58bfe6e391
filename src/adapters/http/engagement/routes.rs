//! Router for comment and bookmark endpoints.

use axum::routing::{delete, get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{create_comment, delete_comment, list_bookmarks, list_comments, toggle_bookmark};

/// Mounted under `/api`. `:kind` is `blogs` or `resources`.
pub fn engagement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/content/:kind/:item_id/comments",
            get(list_comments).post(create_comment),
        )
        .route("/content/:kind/:item_id/bookmark", post(toggle_bookmark))
        .route("/comments/:id", delete(delete_comment))
        .route("/bookmarks", get(list_bookmarks))
}
