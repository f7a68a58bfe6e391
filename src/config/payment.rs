//! Payment gateway configuration (Razorpay)

use serde::Deserialize;

use super::error::ValidationError;

/// Gateway credentials are optional: without them the service runs, and
/// checkout requests fail with a configuration error.
#[derive(Clone, Deserialize)]
pub struct PaymentConfig {
    pub razorpay_key_id: Option<String>,

    pub razorpay_key_secret: Option<String>,

    /// ISO 4217 code used for every order.
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    /// True when both key id and secret are present.
    pub fn is_configured(&self) -> bool {
        present(&self.razorpay_key_id) && present(&self.razorpay_key_secret)
    }

    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id
            .as_deref()
            .is_some_and(|id| id.starts_with("rzp_test_"))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if present(&self.razorpay_key_id) != present(&self.razorpay_key_secret) {
            return Err(ValidationError::PartialGatewayCredentials);
        }
        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        Ok(())
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("razorpay_key_id", &self.razorpay_key_id)
            .field(
                "razorpay_key_secret",
                &self.razorpay_key_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("currency", &self.currency)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: None,
            razorpay_key_secret: None,
            currency: default_currency(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com".to_string()
}
