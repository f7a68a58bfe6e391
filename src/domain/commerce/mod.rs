//! Commerce domain - payments, purchases and subscriptions.
//!
//! # Payment Flow
//!
//! 1. An order is created at the gateway and a PENDING [`Payment`] stored
//! 2. The client completes checkout and posts the gateway signature back
//! 3. [`PaymentSignatureVerifier`] checks the signature
//! 4. The payment moves to SUCCESS and the entitlement is granted:
//!    a [`Purchase`] row or an activated [`Subscription`]

mod errors;
mod payment;
mod plan;
mod purchase;
mod signature;
mod subscription;

pub use errors::CommerceError;
pub use payment::{
    receipt_for, to_minor_units, Payment, PaymentPurpose, PaymentStatus, MAX_RECEIPT_LEN,
    MINOR_UNITS_PER_MAJOR,
};
pub use plan::SubscriptionPlan;
pub use purchase::Purchase;
pub use signature::PaymentSignatureVerifier;
pub use subscription::{carry_over, Subscription, SubscriptionStatus};
