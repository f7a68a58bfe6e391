//! Commerce handlers.
//!
//! ## Commands
//! - Creating gateway orders for paid items and subscription plans
//! - Verifying checkout callbacks and granting entitlements
//! - Reporting failed checkouts
//! - Cancelling subscriptions
//! - Creating and deactivating plans (admin)
//!
//! ## Queries
//! - Get my subscription
//! - List plans
//! - List payments (admin)

mod create_order;
mod create_subscription_order;
mod list_payments;
mod plans;
mod report_payment_failure;
mod subscription;
mod verify_payment;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use create_order::{CheckoutOrder, CreateOrderCommand, CreateOrderHandler};
pub use create_subscription_order::{
    CreateSubscriptionOrderCommand, CreateSubscriptionOrderHandler, SubscriptionCheckout,
};
pub use plans::{CreatePlanCommand, CreatePlanHandler, DeactivatePlanHandler};
pub use report_payment_failure::{ReportPaymentFailureCommand, ReportPaymentFailureHandler};
pub use subscription::CancelSubscriptionHandler;
pub use verify_payment::{VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult};

// Queries
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery, DEFAULT_PAYMENT_LIMIT, MAX_PAYMENT_LIMIT};
pub use plans::ListPlansHandler;
pub use subscription::{GetSubscriptionHandler, SubscriptionView};
