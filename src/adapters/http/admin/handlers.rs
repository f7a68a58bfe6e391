//! HTTP handlers for admin-only endpoints.
//!
//! Every handler takes `RequireAdmin`, so non-admins get 403 before any
//! work is done.

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};

use crate::application::handlers::account::ModerateUserCommand;
use crate::application::handlers::commerce::{CreatePlanCommand, ListPaymentsQuery};
use crate::application::handlers::media::UploadMediaCommand;
use crate::domain::account::Moderation;
use crate::domain::commerce::PaymentStatus;

use super::super::commerce::dto::{PaymentResponse, PlanResponse};
use super::super::error::{parse_id, ApiError};
use super::super::middleware::RequireAdmin;
use super::super::state::AppState;
use super::dto::{
    CreatePlanRequest, ListPaymentsParams, MediaKeyParams, MediaResponse, SetRoleRequest, UserResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Media
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/media - raw body, type from `Content-Type`
pub async fn upload_media(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<MediaResponse>), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let result = state
        .upload_media_handler()
        .handle(UploadMediaCommand {
            content_type,
            bytes: body.to_vec(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// DELETE /api/admin/media?key=media/...
pub async fn delete_media(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<MediaKeyParams>,
) -> Result<StatusCode, ApiError> {
    state.delete_media_handler().handle(&params.key).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/payments
pub async fn list_payments(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ListPaymentsParams>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let status = match params.status.as_deref() {
        Some(raw) => Some(
            PaymentStatus::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown payment status '{}'", raw)))?,
        ),
        None => None,
    };
    let payments = state
        .list_payments_handler()
        .handle(ListPaymentsQuery {
            status,
            limit: params.limit,
        })
        .await?;
    Ok(Json(payments.iter().map(PaymentResponse::from).collect()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════════

async fn moderate(
    state: &AppState,
    admin: RequireAdmin,
    id: &str,
    action: Moderation,
) -> Result<Json<UserResponse>, ApiError> {
    let RequireAdmin(actor) = admin;
    let user = state
        .moderate_user_handler()
        .handle(ModerateUserCommand {
            actor,
            target: parse_id(id, "user id")?,
            action,
        })
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/admin/users/:id/ban
pub async fn ban_user(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    moderate(&state, admin, &id, Moderation::Ban).await
}

/// POST /api/admin/users/:id/unban
pub async fn unban_user(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    moderate(&state, admin, &id, Moderation::Unban).await
}

/// PUT /api/admin/users/:id/role
pub async fn set_user_role(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    moderate(&state, admin, &id, Moderation::SetRole(request.role)).await
}

// ════════════════════════════════════════════════════════════════════════════════
// Plans
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/plans - including inactive
pub async fn list_all_plans(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = state.list_plans_handler().handle(true).await?;
    Ok(Json(plans.iter().map(PlanResponse::from).collect()))
}

/// POST /api/admin/plans
pub async fn create_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    let plan = state
        .create_plan_handler()
        .handle(CreatePlanCommand {
            name: request.name,
            price: request.price,
            duration_days: request.duration_days,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PlanResponse::from(&plan))))
}

/// POST /api/admin/plans/:id/deactivate
pub async fn deactivate_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state
        .deactivate_plan_handler()
        .handle(parse_id(&id, "plan id")?)
        .await?;
    Ok(Json(PlanResponse::from(&plan)))
}
