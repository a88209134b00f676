// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 access token verification.
//!
//! # Invariants
//! - Verification is stateless: the same token and secret give the same
//!   outcome, modulo `exp`.
//! - Only HS256 is accepted; `alg: none` and asymmetric headers are rejected
//!   as malformed.

use std::fmt;

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use super::Claims;
use crate::config::Settings;

/// Key material and validation policy for access tokens.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    require_exp: bool,
    leeway_secs: u64,
}

impl JwtConfig {
    /// HS256 verification with `secret` and no leeway.
    ///
    /// `exp` and `nbf` are enforced when present. Tokens without `exp` are
    /// accepted unless [`require_exp`](Self::require_exp) is set.
    pub fn hs256(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            require_exp: false,
            leeway_secs: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::hs256(settings.jwt_secret.as_bytes())
            .require_exp(settings.require_exp)
            .leeway(settings.leeway_secs)
    }

    /// Whether tokens without an `exp` claim are rejected.
    pub fn require_exp(mut self, required: bool) -> Self {
        self.require_exp = required;
        self
    }

    /// Clock skew tolerance applied to `exp`.
    pub fn leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.validate_aud = false;
        validation.validate_nbf = true;
        validation.required_spec_claims.clear();
        if self.require_exp {
            validation.set_required_spec_claims(&["exp"]);
        }
        validation
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("require_exp", &self.require_exp)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Error returned when token verification fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("invalid JWT signature")]
    InvalidSignature,
    #[error("JWT has expired")]
    TokenExpired,
    #[error("JWT is not valid yet")]
    NotYetValid,
    #[error("malformed JWT")]
    MalformedToken,
    #[error("missing '{0}' claim in JWT")]
    MissingClaim(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Verifies `token` against `config` and returns its claims.
///
/// # Errors
/// Returns [`JwtError`] if the signature, the expiry or the payload shape is
/// wrong, or if the configured secret is empty.
pub async fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    if config.secret.is_empty() {
        return Err(JwtError::InvalidKey("secret must be non-empty".to_string()));
    }

    let key = DecodingKey::from_secret(&config.secret);
    let token_data = decode::<Claims>(token, &key, &config.validation()).map_err(map_jwt_error)?;

    let claims = token_data.claims;
    if claims.id.is_empty() {
        return Err(JwtError::MissingClaim("id".to_string()));
    }

    Ok(claims)
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::ImmatureSignature => JwtError::NotYetValid,
        ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
        _ => JwtError::MalformedToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-key-that-is-long-enough";

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    fn sign(payload: serde_json::Value, secret: &[u8]) -> String {
        encode(&Header::new(Algorithm::HS256), &payload, &EncodingKey::from_secret(secret))
            .expect("failed to create test token")
    }

    #[tokio::test]
    async fn valid_token_yields_signed_id() {
        let token = sign(json!({"id": "user-123", "exp": now() + 3600}), SECRET);
        let claims = verify_token(&token, &JwtConfig::hs256(SECRET)).await.unwrap();
        assert_eq!(claims.id, "user-123");
    }

    #[tokio::test]
    async fn different_users_get_their_own_ids() {
        let config = JwtConfig::hs256(SECRET);
        let alice = sign(json!({"id": "alice", "exp": now() + 60}), SECRET);
        let bob = sign(json!({"id": "bob", "exp": now() + 60}), SECRET);

        assert_eq!(verify_token(&alice, &config).await.unwrap().id, "alice");
        assert_eq!(verify_token(&bob, &config).await.unwrap().id, "bob");
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid_signature() {
        let token = sign(json!({"id": "user-123", "exp": now() + 3600}), SECRET);
        let config = JwtConfig::hs256(b"wrong-secret-key-that-is-different");
        assert_eq!(verify_token(&token, &config).await, Err(JwtError::InvalidSignature));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let token = sign(json!({"id": "user-123", "exp": now() - 3600}), SECRET);
        assert_eq!(
            verify_token(&token, &JwtConfig::hs256(SECRET)).await,
            Err(JwtError::TokenExpired)
        );
    }

    #[tokio::test]
    async fn leeway_tolerates_recent_expiry() {
        let token = sign(json!({"id": "user-123", "exp": now() - 10}), SECRET);
        let config = JwtConfig::hs256(SECRET).leeway(120);
        assert!(verify_token(&token, &config).await.is_ok());
    }

    #[tokio::test]
    async fn missing_exp_depends_on_policy() {
        let token = sign(json!({"id": "user-123"}), SECRET);

        let strict = JwtConfig::hs256(SECRET).require_exp(true);
        assert_eq!(
            verify_token(&token, &strict).await,
            Err(JwtError::MissingClaim("exp".to_string()))
        );

        let relaxed = JwtConfig::hs256(SECRET);
        assert_eq!(verify_token(&token, &relaxed).await.unwrap().id, "user-123");
    }

    #[tokio::test]
    async fn id_only_token_verifies_by_default() {
        let token = sign(json!({"id": "u1", "iat": 1700000000}), SECRET);
        let claims = verify_token(&token, &JwtConfig::hs256(SECRET)).await.unwrap();
        assert_eq!(claims.id, "u1");
        assert_eq!(claims.exp, None);
    }

    #[tokio::test]
    async fn future_nbf_is_not_yet_valid() {
        let token = sign(
            json!({"id": "u1", "exp": now() + 7200, "nbf": now() + 3600}),
            SECRET,
        );
        assert_eq!(
            verify_token(&token, &JwtConfig::hs256(SECRET)).await,
            Err(JwtError::NotYetValid)
        );
    }

    #[tokio::test]
    async fn past_nbf_is_accepted() {
        let token = sign(json!({"id": "u1", "nbf": now() - 60}), SECRET);
        assert!(verify_token(&token, &JwtConfig::hs256(SECRET)).await.is_ok());
    }

    #[tokio::test]
    async fn missing_id_is_rejected() {
        let token = sign(json!({"sub": "user-123", "exp": now() + 60}), SECRET);
        assert_eq!(
            verify_token(&token, &JwtConfig::hs256(SECRET)).await,
            Err(JwtError::MissingClaim("id".to_string()))
        );
    }

    #[tokio::test]
    async fn malformed_tokens_are_rejected() {
        let config = JwtConfig::hs256(SECRET);
        for token in ["", "not-a-valid-jwt", "a.b.c"] {
            assert_eq!(
                verify_token(token, &config).await,
                Err(JwtError::MalformedToken),
                "{token:?}"
            );
        }
    }

    #[tokio::test]
    async fn other_algorithms_are_rejected() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"id": "user-123", "exp": now() + 60}),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(
            verify_token(&token, &JwtConfig::hs256(SECRET)).await,
            Err(JwtError::MalformedToken)
        );
    }

    #[tokio::test]
    async fn empty_secret_is_invalid_key() {
        let config = JwtConfig::hs256(b"");
        assert_eq!(
            verify_token("some.jwt.token", &config).await,
            Err(JwtError::InvalidKey("secret must be non-empty".to_string()))
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", JwtConfig::hs256(SECRET));
        assert!(!rendered.contains("test-secret"));
    }
}
