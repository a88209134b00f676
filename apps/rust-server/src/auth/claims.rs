// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AuthError, OwnershipEnforcer};

/// Claims decoded from a verified access token.
///
/// Attached to the request extensions by the auth gate and read by handlers
/// through [`Auth`](super::Auth). Lives only as long as the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Unique user identifier. Empty when the token carries none, which
    /// verification rejects.
    #[serde(default)]
    pub id: String,

    /// Expiration (seconds since the Unix epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,

    /// Issued at (seconds since the Unix epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,

    /// Remaining payload members, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Claims carrying only a user id.
    pub fn for_user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exp: None,
            iat: None,
            extra: Map::new(),
        }
    }

    pub fn with_exp(mut self, exp: u64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Token expiry as a timestamp, if the token has one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|exp| i64::try_from(exp).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Fails with [`AuthError::Forbidden`] carrying `denial` unless this
    /// identity is `owner_id`.
    pub fn ensure_owner(&self, owner_id: &str, denial: &str) -> Result<(), AuthError> {
        owner_id.verify_ownership(self, denial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_id_only_payload() {
        let claims: Claims =
            serde_json::from_value(json!({"id": "64f0c2", "iat": 1700000000})).unwrap();
        assert_eq!(claims.id, "64f0c2");
        assert_eq!(claims.iat, Some(1700000000));
        assert_eq!(claims.exp, None);
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn keeps_extra_members() {
        let claims: Claims = serde_json::from_value(json!({
            "id": "u1",
            "exp": 1700003600,
            "name": "ada",
            "channels": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(claims.extra["name"], "ada");
        assert_eq!(claims.extra["channels"], json!(["a", "b"]));
    }

    #[test]
    fn missing_id_defaults_to_empty() {
        let claims: Claims = serde_json::from_value(json!({"sub": "u1"})).unwrap();
        assert!(claims.id.is_empty());
    }

    #[test]
    fn expires_at_converts_exp() {
        let claims = Claims::for_user("u1").with_exp(1700000000);
        let expires = claims.expires_at().unwrap();
        assert_eq!(expires.timestamp(), 1700000000);
        assert!(Claims::for_user("u1").expires_at().is_none());
    }

    #[test]
    fn ensure_owner_compares_ids() {
        let claims = Claims::for_user("u1");
        assert!(claims.ensure_owner("u1", "denied").is_ok());
        let err = claims.ensure_owner("u2", "denied").unwrap_err();
        assert_eq!(err.to_string(), "denied");
    }

    #[test]
    fn serializes_back_without_absent_fields() {
        let value = serde_json::to_value(Claims::for_user("u1")).unwrap();
        assert_eq!(value, json!({"id": "u1"}));
    }
}
