//! PostgreSQL implementations of SubscriptionRepository and PlanRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::domain::commerce::{Subscription, SubscriptionPlan, SubscriptionStatus};
use crate::domain::foundation::{DomainError, ErrorCode, PlanId, SubscriptionId, Timestamp, UserId};
use crate::ports::{PlanRepository, SubscriptionRepository};

use super::corrupt_column;

const SUBSCRIPTION_COLUMNS: &str =
    "SELECT id, user_id, plan_id, status, start_date, end_date, created_at FROM subscriptions";

const PLAN_COLUMNS: &str = "SELECT id, name, price, duration_days, active, created_at FROM subscription_plans";

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    plan_id: Uuid,
    status: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            status: SubscriptionStatus::parse(&row.status)
                .ok_or_else(|| corrupt_column("status", &row.status))?,
            start_date: Timestamp::from_datetime(row.start_date),
            end_date: Timestamp::from_datetime(row.end_date),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// Shared with the payment repository, which writes checkouts in a transaction.
pub(super) async fn insert_subscription<'e, E>(executor: E, subscription: &Subscription) -> Result<(), DomainError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO subscriptions (id, user_id, plan_id, status, start_date, end_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(subscription.id.as_uuid())
    .bind(subscription.user_id.as_uuid())
    .bind(subscription.plan_id.as_uuid())
    .bind(subscription.status.as_str())
    .bind(subscription.start_date.as_datetime())
    .bind(subscription.end_date.as_datetime())
    .bind(subscription.created_at.as_datetime())
    .execute(executor)
    .await
    .map_err(|e| DomainError::database("Failed to insert subscription", e))?;
    Ok(())
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn insert(&self, subscription: &Subscription) -> Result<(), DomainError> {
        insert_subscription(&self.pool, subscription).await
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE subscriptions SET status = $2, start_date = $3, end_date = $4 WHERE id = $1",
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.status.as_str())
        .bind(subscription.start_date.as_datetime())
        .bind(subscription.end_date.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update subscription", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", subscription.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!("{} WHERE id = $1", SUBSCRIPTION_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch subscription", e))?;
        row.map(Subscription::try_from).transpose()
    }

    async fn find_latest_for_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch subscription", e))?;
        row.map(Subscription::try_from).transpose()
    }

    async fn find_active_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND status = 'ACTIVE' AND end_date >= $2 ORDER BY end_date DESC LIMIT 1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user_id.as_uuid())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch active subscription", e))?;
        row.map(Subscription::try_from).transpose()
    }
}

pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    price: i64,
    duration_days: i64,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<PlanRow> for SubscriptionPlan {
    fn from(row: PlanRow) -> Self {
        SubscriptionPlan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            price: row.price,
            duration_days: row.duration_days,
            active: row.active,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn insert(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscription_plans (id, name, price, duration_days, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.price)
        .bind(plan.duration_days)
        .bind(plan.active)
        .bind(plan.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert plan", e))?;
        Ok(())
    }

    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE subscription_plans SET name = $2, price = $3, duration_days = $4, active = $5 WHERE id = $1",
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.price)
        .bind(plan.duration_days)
        .bind(plan.active)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update plan", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PlanNotFound,
                format!("Subscription plan not found: {}", plan.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(&format!("{} WHERE id = $1", PLAN_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch plan", e))?;
        Ok(row.map(SubscriptionPlan::from))
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(&format!(
            "{} WHERE ($1 OR active) ORDER BY price ASC",
            PLAN_COLUMNS
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list plans", e))?;
        Ok(rows.into_iter().map(SubscriptionPlan::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription_row(status: &str) -> SubscriptionRow {
        let now = Utc::now();
        SubscriptionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            status: status.to_string(),
            start_date: now,
            end_date: now + chrono::Duration::days(30),
            created_at: now,
        }
    }

    #[test]
    fn subscription_row_converts_for_every_status() {
        for status in [
            SubscriptionStatus::Pending,
            SubscriptionStatus::Active,
            SubscriptionStatus::Cancelled,
            SubscriptionStatus::Expired,
        ] {
            let sub = Subscription::try_from(subscription_row(status.as_str())).unwrap();
            assert_eq!(sub.status, status);
        }
    }

    #[test]
    fn subscription_row_keeps_window() {
        let row = subscription_row("ACTIVE");
        let (start, end) = (row.start_date, row.end_date);
        let sub = Subscription::try_from(row).unwrap();
        assert_eq!(sub.start_date, Timestamp::from_datetime(start));
        assert_eq!(sub.end_date, Timestamp::from_datetime(end));
        assert!(sub.is_entitled(Timestamp::from_datetime(start)));
    }

    #[test]
    fn corrupt_subscription_status_is_database_error() {
        let err = Subscription::try_from(subscription_row("PAUSED")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn plan_row_converts() {
        let id = Uuid::new_v4();
        let plan = SubscriptionPlan::from(PlanRow {
            id,
            name: "Annual".to_string(),
            price: 1_999,
            duration_days: 365,
            active: false,
            created_at: Utc::now(),
        });
        assert_eq!(plan.id, PlanId::from_uuid(id));
        assert_eq!(plan.name, "Annual");
        assert_eq!(plan.price, 1_999);
        assert_eq!(plan.duration_days, 365);
        assert!(!plan.active);
    }
}
