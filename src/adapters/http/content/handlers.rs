//! HTTP handlers for blog and resource endpoints.
//!
//! Blogs and resources share these handlers; the router binds the kind.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;

use crate::application::handlers::content::{
    CreateContentCommand, DeleteContentCommand, GetContentQuery, ListContentQuery, UpdateContentCommand,
};
use crate::domain::content::ContentKind;

use super::super::error::{parse_id, ApiError};
use super::super::middleware::{OptionalAuth, RequireAdmin};
use super::super::state::AppState;
use super::dto::{
    ContentListResponse, ContentResponse, CreateContentRequest, ListContentParams, UpdateContentRequest,
};

/// GET /api/{blogs|resources}
pub async fn list_content(
    kind: ContentKind,
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Query(params): Query<ListContentParams>,
) -> Result<Json<ContentListResponse>, ApiError> {
    let page = state
        .list_content_handler()
        .handle(ListContentQuery {
            kind,
            tag: params.tag,
            page: params.page,
            per_page: params.per_page,
            include_unpublished: params.include_unpublished,
            viewer,
        })
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/{blogs|resources}/:slug
pub async fn get_content(
    kind: ContentKind,
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<Json<ContentResponse>, ApiError> {
    let view = state
        .get_content_handler()
        .handle(GetContentQuery { kind, slug, viewer })
        .await?;
    Ok(Json(ContentResponse::from(&view)))
}

/// GET /api/admin/{blogs|resources}
pub async fn admin_list_content(
    kind: ContentKind,
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<ListContentParams>,
) -> Result<Json<ContentListResponse>, ApiError> {
    let page = state
        .list_content_handler()
        .handle(ListContentQuery {
            kind,
            tag: params.tag,
            page: params.page,
            per_page: params.per_page,
            include_unpublished: true,
            viewer: Some(admin),
        })
        .await?;
    Ok(Json(page.into()))
}

/// POST /api/admin/{blogs|resources}
pub async fn create_content(
    kind: ContentKind,
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentResponse>), ApiError> {
    let item = state
        .create_content_handler()
        .handle(CreateContentCommand {
            kind,
            author_id: admin.id,
            draft: request.into(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ContentResponse::full(&item))))
}

/// PUT /api/admin/{blogs|resources}/:id
pub async fn update_content(
    kind: ContentKind,
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    let item = state
        .update_content_handler()
        .handle(UpdateContentCommand {
            kind,
            id: parse_id(&id, "content id")?,
            patch: request.into(),
        })
        .await?;
    Ok(Json(ContentResponse::full(&item)))
}

/// DELETE /api/admin/{blogs|resources}/:id
pub async fn delete_content(
    kind: ContentKind,
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_content_handler()
        .handle(DeleteContentCommand {
            kind,
            id: parse_id(&id, "content id")?,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
