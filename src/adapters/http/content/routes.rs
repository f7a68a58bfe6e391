//! Routers for blog and resource endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::routing::{get, put};
use axum::Router;

use crate::domain::content::ContentKind;

use super::super::middleware::{OptionalAuth, RequireAdmin};
use super::super::state::AppState;
use super::dto::{CreateContentRequest, ListContentParams, UpdateContentRequest};
use super::handlers::{
    admin_list_content, create_content, delete_content, get_content, list_content, update_content,
};

/// Public routes for one kind, mounted at `/api/blogs` or `/api/resources`.
///
/// - `GET /` - published listing
/// - `GET /:slug` - single item through the entitlement check
pub fn content_routes(kind: ContentKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(
                move |state: State<AppState>, viewer: OptionalAuth, params: Query<ListContentParams>| {
                    list_content(kind, state, viewer, params)
                },
            ),
        )
        .route(
            "/:slug",
            get(
                move |state: State<AppState>, viewer: OptionalAuth, slug: Path<String>| {
                    get_content(kind, state, viewer, slug)
                },
            ),
        )
}

/// Admin routes for one kind, mounted at `/api/admin/blogs` or
/// `/api/admin/resources`.
pub fn admin_content_routes(kind: ContentKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(
                move |state: State<AppState>, admin: RequireAdmin, params: Query<ListContentParams>| {
                    admin_list_content(kind, state, admin, params)
                },
            )
            .post(
                move |state: State<AppState>, admin: RequireAdmin, body: Json<CreateContentRequest>| {
                    create_content(kind, state, admin, body)
                },
            ),
        )
        .route(
            "/:id",
            put(
                move |state: State<AppState>,
                      admin: RequireAdmin,
                      id: Path<String>,
                      body: Json<UpdateContentRequest>| {
                    update_content(kind, state, admin, id, body)
                },
            )
            .delete(move |state: State<AppState>, admin: RequireAdmin, id: Path<String>| {
                delete_content(kind, state, admin, id)
            }),
        )
}
