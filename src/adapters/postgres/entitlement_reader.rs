//! PostgreSQL implementation of EntitlementReader.
//!
//! Both questions are single `EXISTS` lookups served by
//! `purchases_user_item_key` and `subscriptions_user_status_idx`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::content::ContentKind;
use crate::domain::foundation::{ContentId, DomainError, Timestamp, UserId};
use crate::ports::EntitlementReader;

pub struct PostgresEntitlementReader {
    pool: PgPool,
}

impl PostgresEntitlementReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitlementReader for PostgresEntitlementReader {
    async fn has_purchase(
        &self,
        user_id: &UserId,
        kind: ContentKind,
        item_id: &ContentId,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM purchases WHERE user_id = $1 AND item_id = $2 AND kind = $3)",
        )
        .bind(user_id.as_uuid())
        .bind(item_id.as_uuid())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to check purchase", e))
    }

    async fn has_active_subscription(&self, user_id: &UserId, now: Timestamp) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM subscriptions
                WHERE user_id = $1 AND status = 'ACTIVE' AND end_date >= $2
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to check subscription", e))
    }
}
