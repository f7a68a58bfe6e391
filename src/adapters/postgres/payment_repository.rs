//! PostgreSQL implementation of PaymentRepository.
//!
//! `complete` runs in one transaction: a conditional status update guards
//! the grant, so two concurrent callbacks can never both grant.
//!
//! Subscription activations for one user are serialized by locking the
//! user's row; the partial unique index `subscriptions_one_active_per_user`
//! backs this up.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::commerce::{carry_over, Payment, PaymentPurpose, PaymentStatus, Subscription};
use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, Timestamp, UserId};
use crate::ports::{Completion, GatewayConfirmation, Grant, PaymentRepository};

use super::corrupt_column;
use super::subscription_repository::insert_subscription;

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, amount, currency, status, gateway_order_id,
           gateway_payment_id, signature, metadata, created_at, updated_at
    FROM payments
"#;

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    amount: i64,
    currency: String,
    status: String,
    gateway_order_id: String,
    gateway_payment_id: Option<String>,
    signature: Option<String>,
    metadata: Json<PaymentPurpose>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            amount: row.amount,
            currency: row.currency,
            status: PaymentStatus::parse(&row.status).ok_or_else(|| corrupt_column("status", &row.status))?,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            signature: row.signature,
            purpose: row.metadata.0,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

async fn insert_payment<'e, E>(executor: E, payment: &Payment) -> Result<(), DomainError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, user_id, amount, currency, status, gateway_order_id,
            gateway_payment_id, signature, metadata, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(payment.id.as_uuid())
    .bind(payment.user_id.as_uuid())
    .bind(payment.amount)
    .bind(&payment.currency)
    .bind(payment.status.as_str())
    .bind(&payment.gateway_order_id)
    .bind(&payment.gateway_payment_id)
    .bind(&payment.signature)
    .bind(Json(payment.purpose))
    .bind(payment.created_at.as_datetime())
    .bind(payment.updated_at.as_datetime())
    .execute(executor)
    .await
    .map_err(|e| DomainError::database("Failed to insert payment", e))?;
    Ok(())
}

async fn apply_grant(tx: &mut Transaction<'_, Postgres>, grant: Grant) -> Result<(), DomainError> {
    match grant {
        Grant::Purchase(purchase) => {
            // A concurrent grant for the same (user, item) already did the work
            sqlx::query(
                r#"
                INSERT INTO purchases (id, user_id, kind, item_id, payment_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT ON CONSTRAINT purchases_user_item_key DO NOTHING
                "#,
            )
            .bind(purchase.id.as_uuid())
            .bind(purchase.user_id.as_uuid())
            .bind(purchase.kind.as_str())
            .bind(purchase.item_id.as_uuid())
            .bind(purchase.payment_id.as_uuid())
            .bind(purchase.created_at.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::database("Failed to insert purchase", e))?;
        }
        Grant::ActivateSubscription {
            subscription_id,
            start_date,
            end_date,
        } => {
            let subscriber: Option<Uuid> =
                sqlx::query_scalar("SELECT user_id FROM subscriptions WHERE id = $1 FOR UPDATE")
                    .bind(subscription_id.as_uuid())
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(|e| DomainError::database("Failed to lock subscription", e))?;
            let subscriber = subscriber.ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SubscriptionNotFound,
                    format!("Subscription not found: {}", subscription_id),
                )
            })?;

            // One activation per user at a time
            sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(subscriber)
                .execute(&mut **tx)
                .await
                .map_err(|e| DomainError::database("Failed to lock subscriber", e))?;

            let replaced: Vec<DateTime<Utc>> = sqlx::query_scalar(
                r#"
                UPDATE subscriptions SET status = 'EXPIRED'
                WHERE user_id = $1 AND id <> $2 AND status = 'ACTIVE'
                RETURNING end_date
                "#,
            )
            .bind(subscriber)
            .bind(subscription_id.as_uuid())
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| DomainError::database("Failed to supersede subscription", e))?;
            let replaced_end = replaced.into_iter().map(Timestamp::from_datetime).max();

            sqlx::query(
                "UPDATE subscriptions SET status = 'ACTIVE', start_date = $2, end_date = $3 WHERE id = $1",
            )
            .bind(subscription_id.as_uuid())
            .bind(start_date.as_datetime())
            .bind(carry_over(start_date, end_date, replaced_end).as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::database("Failed to activate subscription", e))?;
        }
    }
    Ok(())
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        insert_payment(&self.pool, payment).await
    }

    async fn insert_subscription_checkout(
        &self,
        payment: &Payment,
        subscription: &Subscription,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;
        insert_subscription(&mut *tx, subscription).await?;
        insert_payment(&mut *tx, payment).await?;
        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit subscription checkout", e))
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch payment", e))?;
        row.map(Payment::try_from).transpose()
    }

    async fn list(&self, status: Option<PaymentStatus>, limit: u32) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC LIMIT $2",
            SELECT_COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn complete(
        &self,
        id: &PaymentId,
        confirmation: GatewayConfirmation,
        grant: Grant,
    ) -> Result<Completion, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let updated = sqlx::query(
            r#"
            UPDATE payments SET
                status = 'SUCCESS',
                gateway_payment_id = $2,
                signature = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(id.as_uuid())
        .bind(&confirmation.gateway_payment_id)
        .bind(&confirmation.signature)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to complete payment", e))?;

        if updated.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| DomainError::database("Failed to roll back", e))?;

            let exists = self.find_by_id(id).await?.is_some();
            if !exists {
                return Err(DomainError::new(
                    ErrorCode::PaymentNotFound,
                    format!("Payment not found: {}", id),
                ));
            }
            return Ok(Completion::AlreadyCompleted);
        }

        // Dropping the transaction on error rolls it back
        apply_grant(&mut tx, grant).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit payment completion", e))?;
        Ok(Completion::Completed)
    }

    async fn mark_failed(&self, id: &PaymentId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE payments SET status = 'FAILED', updated_at = NOW() WHERE id = $1 AND status = 'PENDING'",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to mark payment failed", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::ContentKind;
    use crate::domain::foundation::{ContentId, PlanId, SubscriptionId};
    use serde_json::json;

    fn row(status: &str, purpose: PaymentPurpose) -> PaymentRow {
        let now = Utc::now();
        PaymentRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: 49_900,
            currency: "INR".to_string(),
            status: status.to_string(),
            gateway_order_id: "order_1".to_string(),
            gateway_payment_id: None,
            signature: None,
            metadata: Json(purpose),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_for_every_status() {
        let purpose = PaymentPurpose::content(ContentKind::Blog, ContentId::new());
        for (stored, expected) in [
            ("PENDING", PaymentStatus::Pending),
            ("SUCCESS", PaymentStatus::Success),
            ("FAILED", PaymentStatus::Failed),
        ] {
            let payment = Payment::try_from(row(stored, purpose)).unwrap();
            assert_eq!(payment.status, expected);
            assert_eq!(payment.status.as_str(), stored);
        }
    }

    #[test]
    fn row_keeps_ids_and_purpose() {
        let purpose = PaymentPurpose::content(ContentKind::Resource, ContentId::new());
        let stored = row("PENDING", purpose);
        let (id, user_id) = (stored.id, stored.user_id);

        let payment = Payment::try_from(stored).unwrap();
        assert_eq!(payment.id, PaymentId::from_uuid(id));
        assert_eq!(payment.user_id, UserId::from_uuid(user_id));
        assert_eq!(payment.purpose, purpose);
        assert_eq!(payment.amount, 49_900);
    }

    #[test]
    fn corrupt_status_is_database_error() {
        let purpose = PaymentPurpose::content(ContentKind::Blog, ContentId::new());
        let err = Payment::try_from(row("REFUNDED", purpose)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("REFUNDED"));
    }

    #[test]
    fn metadata_column_shape() {
        let plan_id = PlanId::new();
        let subscription_id = SubscriptionId::new();
        let purpose = PaymentPurpose::Subscription {
            plan_id,
            subscription_id,
        };

        let stored = serde_json::to_value(Json(purpose)).unwrap();
        assert_eq!(
            stored,
            json!({
                "type": "SUBSCRIPTION",
                "planId": plan_id.to_string(),
                "subscriptionId": subscription_id.to_string(),
            })
        );
        let loaded: Json<PaymentPurpose> = serde_json::from_value(stored).unwrap();
        assert_eq!(loaded.0, purpose);
    }

    #[test]
    fn content_metadata_uses_item_id() {
        let item_id = ContentId::new();
        let stored = serde_json::to_value(Json(PaymentPurpose::content(ContentKind::Blog, item_id))).unwrap();
        assert_eq!(stored, json!({ "type": "BLOG", "itemId": item_id.to_string() }));
    }
}
