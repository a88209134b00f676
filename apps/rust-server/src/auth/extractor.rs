// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated identity.
//!
//! The gate in [`middleware`](super::middleware) verifies the cookie and
//! stores the [`Claims`] in the request extensions. Handlers read them back
//! with [`Auth`]:
//!
//! ```rust,ignore
//! async fn me(Auth(claims): Auth) -> impl IntoResponse {
//!     Json(claims)
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Claims};

/// Extractor for the verified identity.
///
/// Rejects with [`AuthError::Unauthenticated`] when the route is not behind
/// the gate, so a misrouted handler never runs anonymously.
pub struct Auth(pub Claims);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}
