//! HTTP DTOs for the admin back office.

use serde::{Deserialize, Serialize};

use crate::application::handlers::media::UploadMediaResult;
use crate::domain::account::User;
use crate::domain::foundation::{Role, Timestamp, UserId};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPaymentsParams {
    /// PENDING, SUCCESS or FAILED.
    pub status: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub name: String,
    pub price: i64,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaKeyParams {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub banned: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            banned: user.banned,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

impl From<UploadMediaResult> for MediaResponse {
    fn from(result: UploadMediaResult) -> Self {
        Self {
            key: result.key.as_str().to_string(),
            url: result.url,
            content_type: result.media_type.mime().to_string(),
            size: result.size,
        }
    }
}
