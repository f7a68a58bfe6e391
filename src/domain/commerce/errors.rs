//! Commerce-specific error types.
//!
//! Errors raised while creating orders, verifying payments and managing
//! subscriptions.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ContentNotFound / PaymentNotFound / PlanNotFound / SubscriptionNotFound | 404 |
//! | AlreadyPurchased / AlreadySubscribed | 400 |
//! | NotPurchasable | 400 |
//! | InvalidSignature | 400 |
//! | InvalidState | 400 |
//! | ValidationFailed | 400 |
//! | GatewayNotConfigured / Gateway | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    ContentId, DomainError, ErrorCode, PaymentId, PlanId, UserId, ValidationError,
};

/// Commerce-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Content item does not exist (or is not visible to the caller).
    ContentNotFound(ContentId),

    /// Payment does not exist or belongs to someone else.
    PaymentNotFound(PaymentId),

    /// Subscription plan does not exist or is inactive.
    PlanNotFound(PlanId),

    /// User has no subscription.
    SubscriptionNotFound(UserId),

    /// User already owns the item.
    AlreadyPurchased(ContentId),

    /// User already holds an active subscription.
    AlreadySubscribed(UserId),

    /// Item is not PAID or has no price.
    NotPurchasable(ContentId),

    /// Gateway signature or order id did not match.
    InvalidSignature,

    /// Invalid state for the requested operation.
    InvalidState {
        current: String,
        attempted: String,
    },

    /// Validation failed.
    ValidationFailed {
        field: String,
        message: String,
    },

    /// Gateway credentials are missing.
    GatewayNotConfigured,

    /// Gateway rejected the request or was unreachable.
    Gateway(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl CommerceError {
    pub fn content_not_found(id: ContentId) -> Self {
        CommerceError::ContentNotFound(id)
    }

    pub fn payment_not_found(id: PaymentId) -> Self {
        CommerceError::PaymentNotFound(id)
    }

    pub fn plan_not_found(id: PlanId) -> Self {
        CommerceError::PlanNotFound(id)
    }

    pub fn subscription_not_found(user_id: UserId) -> Self {
        CommerceError::SubscriptionNotFound(user_id)
    }

    pub fn already_purchased(id: ContentId) -> Self {
        CommerceError::AlreadyPurchased(id)
    }

    pub fn already_subscribed(user_id: UserId) -> Self {
        CommerceError::AlreadySubscribed(user_id)
    }

    pub fn not_purchasable(id: ContentId) -> Self {
        CommerceError::NotPurchasable(id)
    }

    pub fn invalid_signature() -> Self {
        CommerceError::InvalidSignature
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        CommerceError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CommerceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        CommerceError::Gateway(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CommerceError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CommerceError::ContentNotFound(_) => ErrorCode::ContentNotFound,
            CommerceError::PaymentNotFound(_) => ErrorCode::PaymentNotFound,
            CommerceError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            CommerceError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            CommerceError::AlreadyPurchased(_) => ErrorCode::AlreadyPurchased,
            CommerceError::AlreadySubscribed(_) => ErrorCode::AlreadySubscribed,
            CommerceError::NotPurchasable(_) => ErrorCode::NotPurchasable,
            CommerceError::InvalidSignature => ErrorCode::InvalidSignature,
            CommerceError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            CommerceError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CommerceError::GatewayNotConfigured => ErrorCode::GatewayNotConfigured,
            CommerceError::Gateway(_) => ErrorCode::GatewayError,
            CommerceError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            CommerceError::ContentNotFound(id) => format!("Content not found: {}", id),
            CommerceError::PaymentNotFound(id) => format!("Payment not found: {}", id),
            CommerceError::PlanNotFound(id) => format!("Subscription plan not found: {}", id),
            CommerceError::SubscriptionNotFound(_) => "No subscription found".to_string(),
            CommerceError::AlreadyPurchased(_) => "You already own this item".to_string(),
            CommerceError::AlreadySubscribed(_) => {
                "You already have an active subscription".to_string()
            }
            CommerceError::NotPurchasable(id) => {
                format!("Content {} is not available for purchase", id)
            }
            CommerceError::InvalidSignature => "Payment verification failed".to_string(),
            CommerceError::InvalidState { current, attempted } => {
                format!("Cannot {} in {} state", attempted, current)
            }
            CommerceError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CommerceError::GatewayNotConfigured => "Payment gateway is not configured".to_string(),
            CommerceError::Gateway(msg) => format!("Payment gateway error: {}", msg),
            CommerceError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CommerceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CommerceError {}

impl From<ValidationError> for CommerceError {
    fn from(err: ValidationError) -> Self {
        CommerceError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for CommerceError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => CommerceError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => CommerceError::InvalidState {
                current: "unknown".to_string(),
                attempted: err.message,
            },
            ErrorCode::InvalidSignature => CommerceError::InvalidSignature,
            ErrorCode::GatewayNotConfigured => CommerceError::GatewayNotConfigured,
            ErrorCode::GatewayError => CommerceError::Gateway(err.message),
            _ => CommerceError::Infrastructure(err.to_string()),
        }
    }
}

impl From<CommerceError> for DomainError {
    fn from(err: CommerceError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_purchased_maps_to_its_code() {
        let err = CommerceError::already_purchased(ContentId::new());
        assert_eq!(err.code(), ErrorCode::AlreadyPurchased);
        assert_eq!(err.message(), "You already own this item");
    }

    #[test]
    fn invalid_signature_message_does_not_leak_details() {
        let err = CommerceError::invalid_signature();
        assert_eq!(err.code(), ErrorCode::InvalidSignature);
        assert_eq!(format!("{}", err), "Payment verification failed");
    }

    #[test]
    fn gateway_errors_pass_message_through() {
        let err = CommerceError::gateway("amount exceeds maximum");
        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert!(err.message().contains("amount exceeds maximum"));
    }

    #[test]
    fn validation_error_keeps_field() {
        let err: CommerceError = ValidationError::out_of_range("price", 1, 100, 0).into();
        assert!(matches!(
            err,
            CommerceError::ValidationFailed { ref field, .. } if field == "price"
        ));
    }

    #[test]
    fn converts_to_domain_error() {
        let err = CommerceError::plan_not_found(PlanId::new());
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, ErrorCode::PlanNotFound);
        assert_eq!(domain.message, err.message());
    }

    #[test]
    fn database_domain_error_becomes_infrastructure() {
        let domain = DomainError::database("Failed to insert payment", "connection reset");
        let err: CommerceError = domain.into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
