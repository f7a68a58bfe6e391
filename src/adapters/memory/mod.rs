//! In-Memory Store Adapter
//!
//! Implements every persistence port over a single lock-protected state.
//! Used by tests and by local development without a database. All writes
//! that span several collections (payment completion) happen under one write
//! guard, which gives the same atomicity as the Postgres transaction.

mod commerce;
mod content;
mod engagement;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::User;
use crate::domain::commerce::{Payment, Purchase, Subscription, SubscriptionPlan};
use crate::domain::content::ContentItem;
use crate::domain::engagement::{Bookmark, Comment};
use crate::domain::foundation::{
    CommentId, ContentId, DomainError, ErrorCode, PaymentId, PlanId, SubscriptionId, UserId,
};
use crate::ports::UserRepository;

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    content: HashMap<ContentId, ContentItem>,
    purchases: Vec<Purchase>,
    payments: HashMap<PaymentId, Payment>,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    plans: HashMap<PlanId, SubscriptionPlan>,
    comments: HashMap<CommentId, Comment>,
    bookmarks: Vec<Bookmark>,
}

/// Shared in-memory persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored purchases (useful for tests).
    pub async fn purchase_count(&self) -> usize {
        self.state.read().await.purchases.len()
    }

    /// All purchases of a user (useful for tests).
    pub async fn purchases_for(&self, user_id: &UserId) -> Vec<Purchase> {
        self.state
            .read()
            .await
            .purchases
            .iter()
            .filter(|p| p.user_id == *user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        self.state.write().await.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user.id),
            )),
        }
    }
}
