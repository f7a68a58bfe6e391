//! Email configuration (Resend)

use serde::Deserialize;

use super::error::ValidationError;

/// Without an API key, mail is logged instead of sent.
#[derive(Clone, Deserialize)]
pub struct EmailConfig {
    pub resend_api_key: Option<String>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// `From` header value.
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// The API key, if delivery is enabled.
    pub fn api_key(&self) -> Option<&str> {
        self.resend_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = self.api_key() {
            if !key.starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        let well_formed = self
            .from_email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("resend_api_key", &self.resend_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_from_email() -> String {
    "no-reply@folio.local".to_string()
}

fn default_from_name() -> String {
    "Folio".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_is_optional() {
        let config = EmailConfig::default();
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_key_counts_as_absent() {
        let config = EmailConfig {
            resend_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn from_header_format() {
        let config = EmailConfig {
            from_email: "hello@folio.example.com".to_string(),
            from_name: "Folio Team".to_string(),
            ..Default::default()
        };
        assert_eq!(config.from_header(), "Folio Team <hello@folio.example.com>");
    }

    #[test]
    fn key_prefix_and_sender_are_checked() {
        let wrong_key = EmailConfig {
            resend_api_key: Some("sk_live_x".to_string()),
            ..Default::default()
        };
        assert_eq!(wrong_key.validate(), Err(ValidationError::InvalidResendKey));

        let bad_from = EmailConfig {
            from_email: "nobody".to_string(),
            ..Default::default()
        };
        assert_eq!(bad_from.validate(), Err(ValidationError::InvalidFromEmail));
    }
}
