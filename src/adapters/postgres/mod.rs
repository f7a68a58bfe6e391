//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresUserRepository` - Accounts, role and ban flag
//! - `PostgresContentRepository` - Blogs and resources
//! - `PostgresPaymentRepository` - Payments and the atomic completion/grant
//! - `PostgresSubscriptionRepository` / `PostgresPlanRepository`
//! - `PostgresCommentRepository` / `PostgresBookmarkRepository`
//! - `PostgresEntitlementReader` - Indexed ownership lookups
//!
//! Enum columns are stored as their upper-case wire names.

mod content_repository;
mod engagement_repository;
mod entitlement_reader;
mod payment_repository;
mod subscription_repository;
mod user_repository;

pub use content_repository::PostgresContentRepository;
pub use engagement_repository::{PostgresBookmarkRepository, PostgresCommentRepository};
pub use entitlement_reader::PostgresEntitlementReader;
pub use payment_repository::PostgresPaymentRepository;
pub use subscription_repository::{PostgresPlanRepository, PostgresSubscriptionRepository};
pub use user_repository::PostgresUserRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Runs embedded migrations from `migrations/`.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Failed to run migrations", e))
}

/// Error for a column value the domain cannot represent.
fn corrupt_column(column: &str, value: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, value),
    )
}

/// Name of the violated unique constraint, if that is what failed.
fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            db_err.constraint().map(str::to_string)
        }
        _ => None,
    }
}

/// Converts a page/offset `u64` to a Postgres BIGINT.
fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
