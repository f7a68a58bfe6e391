//! Router for the admin back office.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::domain::content::ContentKind;
use crate::domain::media::MAX_UPLOAD_BYTES;

use super::super::content::admin_content_routes;
use super::super::state::AppState;
use super::handlers::{
    ban_user, create_plan, deactivate_plan, delete_media, list_all_plans, list_payments, set_user_role,
    unban_user, upload_media,
};

// Headroom so slightly oversized uploads reach validation and get a 400.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Mounted at `/api/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest("/blogs", admin_content_routes(ContentKind::Blog))
        .nest("/resources", admin_content_routes(ContentKind::Resource))
        .route(
            "/media",
            post(upload_media)
                .delete(delete_media)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/payments", get(list_payments))
        .route("/users/:id/ban", post(ban_user))
        .route("/users/:id/unban", post(unban_user))
        .route("/users/:id/role", put(set_user_role))
        .route("/plans", get(list_all_plans).post(create_plan))
        .route("/plans/:id/deactivate", post(deactivate_plan))
}
