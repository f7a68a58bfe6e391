//! Payment repository port.
//!
//! Besides plain persistence this port owns the one multi-row write in the
//! system: completing a payment and granting its entitlement atomically.
//!
//! # Completion contract
//!
//! `complete` must, in one transaction:
//! 1. Move the payment PENDING -> SUCCESS with a conditional update
//!    (`WHERE status = 'PENDING'`)
//! 2. If that update changed a row, apply the [`Grant`]
//!    - `Grant::Purchase`: insert the purchase, ignoring a unique (user, item)
//!      conflict
//!    - `Grant::ActivateSubscription`: set ACTIVE with the given window. Any
//!      other ACTIVE subscription of the same user is superseded (EXPIRED)
//!      and its unused time is appended to the new end date, so a user never
//!      holds two ACTIVE subscriptions
//! 3. If the update changed nothing, apply nothing and report
//!    [`Completion::AlreadyCompleted`]

use async_trait::async_trait;

use crate::domain::commerce::{Payment, PaymentStatus, Purchase, Subscription};
use crate::domain::foundation::{DomainError, PaymentId, SubscriptionId, Timestamp};

/// Entitlement granted by a successful payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    Purchase(Purchase),
    ActivateSubscription {
        subscription_id: SubscriptionId,
        start_date: Timestamp,
        end_date: Timestamp,
    },
}

/// Gateway details recorded on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfirmation {
    pub gateway_payment_id: String,
    pub signature: String,
}

/// Outcome of [`PaymentRepository::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// This call moved the payment to SUCCESS and applied the grant.
    Completed,
    /// The payment was no longer PENDING; nothing was written.
    AlreadyCompleted,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Writes a subscription checkout: the PENDING subscription and the
    /// PENDING payment pointing at it. Both rows or neither.
    async fn insert_subscription_checkout(
        &self,
        payment: &Payment,
        subscription: &Subscription,
    ) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Newest first, optionally filtered by status.
    async fn list(&self, status: Option<PaymentStatus>, limit: u32) -> Result<Vec<Payment>, DomainError>;

    /// Atomically marks the payment SUCCESS and applies the grant.
    async fn complete(
        &self,
        id: &PaymentId,
        confirmation: GatewayConfirmation,
        grant: Grant,
    ) -> Result<Completion, DomainError>;

    /// Conditional PENDING -> FAILED. Returns false if the payment was not PENDING.
    async fn mark_failed(&self, id: &PaymentId) -> Result<bool, DomainError>;
}
