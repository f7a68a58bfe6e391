//! Payment gateway port.
//!
//! Covers the server-side half of an order-based checkout: the server
//! creates an order, the client pays against it, and the gateway signs the
//! result. Signature checking is local (see `PaymentSignatureVerifier`), so
//! the port only needs order creation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::commerce::CommerceError;

/// Request to create a gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    /// Merchant reference, at most 40 characters.
    pub receipt: String,
    /// Free-form key/value notes stored with the order.
    pub notes: Vec<(String, String)>,
}

/// Order created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentGatewayError {
    /// Credentials are missing.
    #[error("Payment gateway is not configured")]
    NotConfigured,

    /// The gateway answered with an error.
    #[error("{0}")]
    Rejected(String),

    /// Transport failure or unreadable response.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<PaymentGatewayError> for CommerceError {
    fn from(err: PaymentGatewayError) -> Self {
        match err {
            PaymentGatewayError::NotConfigured => CommerceError::GatewayNotConfigured,
            other => CommerceError::gateway(other.to_string()),
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, PaymentGatewayError>;

    /// Public key id handed to the client checkout widget.
    fn public_key_id(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn not_configured_maps_to_config_error() {
        let err: CommerceError = PaymentGatewayError::NotConfigured.into();
        assert_eq!(err.code(), ErrorCode::GatewayNotConfigured);
    }

    #[test]
    fn rejection_message_passes_through() {
        let err: CommerceError = PaymentGatewayError::Rejected("Order amount less than minimum".into()).into();
        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert!(err.message().contains("Order amount less than minimum"));
    }
}
