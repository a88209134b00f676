// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! [`require_auth`] runs before every protected handler:
//!
//! 1. read the access token cookie, or reject with 401
//! 2. verify the token against the shared secret, or reject with 403
//! 3. attach the [`Claims`] to the request extensions and call the next
//!    service exactly once
//!
//! The gate defines no timeout of its own. Requests are bounded by the
//! transport's request timeout.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::cookie::{get_cookie, ACCESS_COOKIE_NAME};
use super::jwt::{verify_token, JwtConfig};
use super::AuthError;
use crate::config::Settings;

/// Gate configuration, shared read-only by every request.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Verification key and policy
    pub jwt: Arc<JwtConfig>,
    /// Cookie carrying the access token
    pub cookie_name: Arc<str>,
}

impl AuthConfig {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            jwt: Arc::new(jwt),
            cookie_name: Arc::from(ACCESS_COOKIE_NAME),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(JwtConfig::from_settings(settings))
            .with_cookie_name(settings.cookie_name.as_str())
    }

    pub fn with_cookie_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.cookie_name = name.into();
        self
    }
}

/// Authentication middleware function.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(axum::middleware::from_fn_with_state(auth_config, require_auth));
/// ```
pub async fn require_auth(
    State(config): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = get_cookie(request.headers(), &config.cookie_name).map(str::to_owned) else {
        let err = AuthError::Unauthenticated;
        tracing::debug!(
            path = %request.uri().path(),
            code = err.error_code(),
            "Rejecting request without access token"
        );
        return err.into_response();
    };

    match verify_token(&token, &config.jwt).await {
        Ok(claims) => {
            tracing::debug!(user_id = %claims.id, "Authenticated request");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(reason) => {
            tracing::debug!(
                path = %request.uri().path(),
                reason = %reason,
                "Rejecting request with invalid token"
            );
            AuthError::InvalidToken(reason).into_response()
        }
    }
}
