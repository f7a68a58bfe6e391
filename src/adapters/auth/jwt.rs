//! HS256 JWT session validator.
//!
//! Tokens carry only the user id (`sub`), issuer and expiry. Role and banned
//! flag are read from the user store on every request, so moderation takes
//! effect immediately without revoking tokens.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::{SessionValidator, UserRepository};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    iat: i64,
    exp: i64,
}

pub struct JwtSessionValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_ttl_secs: i64,
    users: Arc<dyn UserRepository>,
}

impl JwtSessionValidator {
    pub fn new(
        secret: &SecretString,
        issuer: impl Into<String>,
        token_ttl_secs: i64,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            issuer: issuer.into(),
            token_ttl_secs,
            users,
        }
    }

    /// Issues a token for `user_id`. Used by tests and local tooling; production
    /// tokens come from the site's sign-in flow sharing the same secret.
    pub fn issue(&self, user_id: &UserId) -> Result<String, AuthError> {
        self.issue_at(user_id, Timestamp::now().as_unix_secs())
    }

    fn issue_at(&self, user_id: &UserId, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: issued_at + self.token_ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::service_unavailable(format!("Failed to sign token: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;
        let user_id: UserId = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup failed during token validation");
                AuthError::service_unavailable(e.message)
            })?
            .ok_or(AuthError::UserNotFound)?;

        if user.banned {
            tracing::info!(user_id = %user.id, "Rejected request from banned account");
            return Err(AuthError::Banned);
        }

        Ok(user.to_authenticated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::account::User;
    use crate::domain::foundation::Role;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    async fn setup() -> (JwtSessionValidator, InMemoryStore, User) {
        let store = InMemoryStore::new();
        let user = User::new("reader@example.com", Some("Reader".to_string()), Role::User);
        store.save(&user).await.unwrap();
        let validator = JwtSessionValidator::new(
            &SecretString::new(SECRET.to_string()),
            "folio",
            3600,
            Arc::new(store.clone()),
        );
        (validator, store, user)
    }

    #[tokio::test]
    async fn valid_token_loads_current_user() {
        let (validator, _store, user) = setup().await;
        let token = validator.issue(&user.id).unwrap();

        let authed = validator.validate(&token).await.unwrap();
        assert_eq!(authed.id, user.id);
        assert_eq!(authed.role, Role::User);
        assert_eq!(authed.name.as_deref(), Some("Reader"));
    }

    #[tokio::test]
    async fn role_change_applies_without_new_token() {
        let (validator, store, mut user) = setup().await;
        let token = validator.issue(&user.id).unwrap();

        user.role = Role::Admin;
        store.update(&user).await.unwrap();

        assert!(validator.validate(&token).await.unwrap().is_admin());
    }

    #[tokio::test]
    async fn banned_user_is_rejected() {
        let (validator, store, mut user) = setup().await;
        let token = validator.issue(&user.id).unwrap();

        user.banned = true;
        store.update(&user).await.unwrap();

        assert_eq!(validator.validate(&token).await.unwrap_err(), AuthError::Banned);
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let (validator, _store, user) = setup().await;
        let token = validator
            .issue_at(&user.id, Timestamp::now().as_unix_secs() - 7200)
            .unwrap();

        assert_eq!(validator.validate(&token).await.unwrap_err(), AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_invalid() {
        let (validator, store, user) = setup().await;
        let other = JwtSessionValidator::new(
            &SecretString::new("another-secret-that-is-also-long-enough".to_string()),
            "folio",
            3600,
            Arc::new(store),
        );
        let token = other.issue(&user.id).unwrap();

        assert_eq!(validator.validate(&token).await.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (validator, _store, _user) = setup().await;
        let token = validator.issue(&UserId::new()).unwrap();

        assert_eq!(validator.validate(&token).await.unwrap_err(), AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let (validator, _store, _user) = setup().await;
        assert_eq!(validator.validate("not.a.jwt").await.unwrap_err(), AuthError::InvalidToken);
    }
}
