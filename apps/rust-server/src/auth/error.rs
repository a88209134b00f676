// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::jwt::JwtError;
use crate::error::ApiError;

/// Rejection produced by the auth gate and ownership checks.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token was presented
    #[error("You are not authenticated")]
    Unauthenticated,
    /// The access token failed verification
    #[error("Token is not valid!")]
    InvalidToken(#[source] JwtError),
    /// Authenticated, but not allowed to act on the resource
    #[error("{0}")]
    Forbidden(String),
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::Forbidden(_) => "forbidden",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) | AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn unauthenticated_returns_401() {
        let response = AuthError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "You are not authenticated");
    }

    #[tokio::test]
    async fn invalid_token_returns_403_without_detail() {
        let response = AuthError::InvalidToken(JwtError::TokenExpired).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["message"], "Token is not valid!");
    }

    #[test]
    fn forbidden_carries_message() {
        let err = AuthError::Forbidden("You can update only your account".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), "forbidden");
        assert_eq!(err.to_string(), "You can update only your account");
    }
}
