//! Top-level axum router.

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::content::ContentKind;

use super::admin::admin_routes;
use super::commerce::commerce_routes;
use super::content::content_routes;
use super::engagement::engagement_routes;
use super::middleware::auth_middleware;
use super::state::AppState;

/// Builds the full API.
///
/// ```text
/// /health
/// /api/blogs, /api/resources          public content
/// /api/orders, /api/payments/*        checkout
/// /api/subscription, /api/plans       subscriptions
/// /api/content/:kind/:id/*, /api/comments, /api/bookmarks
/// /api/admin/*                        admin back office
/// ```
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .nest("/blogs", content_routes(ContentKind::Blog))
        .nest("/resources", content_routes(ContentKind::Resource))
        .nest("/admin", admin_routes())
        .merge(commerce_routes())
        .merge(engagement_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.sessions.clone(), auth_middleware))
        .with_state(state)
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// No origins means same-origin only.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
