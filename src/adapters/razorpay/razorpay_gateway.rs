//! Razorpay payment gateway adapter.
//!
//! Creates orders through `POST /v1/orders` with HTTP basic auth
//! (key id / key secret). The checkout signature is verified locally by
//! `PaymentSignatureVerifier` using the same key secret.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ports::{CreateOrderRequest, GatewayOrder, PaymentGateway, PaymentGatewayError};

const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: Option<String>,
    key_secret: Option<SecretString>,
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: Option<String>, key_secret: Option<SecretString>) -> Self {
        Self {
            key_id: key_id.filter(|k| !k.trim().is_empty()),
            key_secret: key_secret.filter(|s| !s.expose_secret().trim().is_empty()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.key_id.is_some() && self.key_secret.is_some()
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &self.key_secret.as_ref().map(|_| "[REDACTED]"))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    description: Option<String>,
    code: Option<String>,
}

/// Extracts a readable message from a Razorpay error body.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope
            .error
            .description
            .or(envelope.error.code)
            .unwrap_or_else(|| format!("Razorpay returned {}", status)),
        Err(_) if body.trim().is_empty() => format!("Razorpay returned {}", status),
        Err(_) => body.trim().to_string(),
    }
}

/// Razorpay gateway adapter.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, PaymentGatewayError> {
        let (Some(key_id), Some(key_secret)) = (&self.config.key_id, &self.config.key_secret) else {
            tracing::error!("Razorpay credentials missing; cannot create order");
            return Err(PaymentGatewayError::NotConfigured);
        };

        let url = format!("{}/v1/orders", self.config.api_base_url);
        let body = OrderBody {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            notes: request
                .notes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(key_id, Some(key_secret.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentGatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = error_message(status, &error_text);
            tracing::error!(status = %status, error = %message, "Razorpay create_order failed");
            return Err(PaymentGatewayError::Rejected(message));
        }

        let order: OrderResponse = response.json().await.map_err(|e| {
            PaymentGatewayError::Network(format!("Failed to parse Razorpay response: {}", e))
        })?;

        tracing::debug!(order_id = %order.id, amount = order.amount, "Razorpay order created");

        Ok(GatewayOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    }

    fn public_key_id(&self) -> Option<String> {
        self.config.key_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_count_as_missing() {
        let config = RazorpayConfig::new(Some("  ".to_string()), Some(SecretString::new("secret".to_string())));
        assert!(!config.is_configured());

        let config = RazorpayConfig::new(
            Some("rzp_test_key".to_string()),
            Some(SecretString::new("secret".to_string())),
        );
        assert!(config.is_configured());
    }

    #[test]
    fn debug_redacts_secret() {
        let config = RazorpayConfig::new(
            Some("rzp_test_key".to_string()),
            Some(SecretString::new("super-secret".to_string())),
        );
        let output = format!("{:?}", config);
        assert!(output.contains("rzp_test_key"));
        assert!(!output.contains("super-secret"));
    }

    #[test]
    fn error_message_prefers_description() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"The amount must be atleast INR 1.00"}}"#;
        assert_eq!(
            error_message(reqwest::StatusCode::BAD_REQUEST, body),
            "The amount must be atleast INR 1.00"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let msg = error_message(reqwest::StatusCode::BAD_GATEWAY, "");
        assert!(msg.contains("502"));
    }

    #[tokio::test]
    async fn create_order_without_credentials_is_not_configured() {
        let gateway = RazorpayGateway::new(RazorpayConfig::new(None, None));
        let err = gateway
            .create_order(CreateOrderRequest {
                amount: 10_000,
                currency: "INR".to_string(),
                receipt: "rcpt_1".to_string(),
                notes: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err, PaymentGatewayError::NotConfigured);
        assert!(gateway.public_key_id().is_none());
    }
}
