//! User repository port.

use async_trait::async_trait;

use crate::domain::account::User;
use crate::domain::foundation::{DomainError, UserId};

/// Persistence for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace an account.
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Returns `None` if the account does not exist.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Persist role and banned flag.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account doesn't exist
    async fn update(&self, user: &User) -> Result<(), DomainError>;
}
