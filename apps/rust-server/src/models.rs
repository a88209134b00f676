// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive
//! `Serialize` and `ToSchema` for JSON handling and OpenAPI documentation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::auth::{Claims, OwnedResource};

// =============================================================================
// User Profiles
// =============================================================================

/// A stored user profile.
///
/// `data` holds the free-form profile fields. The identifier is kept apart so
/// an update body can never rename the account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserProfile {
    /// Account identifier, equal to the `id` claim of its owner's token.
    pub id: String,
    /// Profile fields (name, email, img, subscribers, ...).
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Map::new(),
        }
    }

    /// Sets every member of `patch` on the profile, leaving other fields as
    /// they are. An `id` member is ignored.
    pub fn apply_patch(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            if key != "id" {
                self.data.insert(key, value);
            }
        }
    }
}

impl OwnedResource for UserProfile {
    fn owner_id(&self) -> &str {
        &self.id
    }
}

/// Body of a profile update: a JSON object whose members are set on the
/// profile.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(value_type = Object)]
pub struct ProfilePatch(pub Map<String, Value>);

// =============================================================================
// Authenticated Identity
// =============================================================================

/// Response for `GET /api/auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    /// Account identifier from the token
    pub id: String,
    /// Token expiry (RFC 3339), when the token has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Remaining token payload members
    #[schema(value_type = Object)]
    pub claims: Map<String, Value>,
}

impl From<Claims> for MeResponse {
    fn from(claims: Claims) -> Self {
        Self {
            expires_at: claims.expires_at().map(|at| at.to_rfc3339()),
            id: claims.id,
            claims: claims.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn patch_sets_members_and_keeps_the_rest() {
        let mut profile = UserProfile::new("u1");
        profile.apply_patch(object(json!({"name": "ada", "subscribers": 3})));
        profile.apply_patch(object(json!({"subscribers": 4, "img": "a.png"})));

        assert_eq!(
            Value::Object(profile.data),
            json!({"name": "ada", "subscribers": 4, "img": "a.png"})
        );
    }

    #[test]
    fn patch_cannot_rename_the_account() {
        let mut profile = UserProfile::new("u1");
        profile.apply_patch(object(json!({"id": "u2", "name": "ada"})));

        assert_eq!(profile.id, "u1");
        assert!(!profile.data.contains_key("id"));
    }

    #[test]
    fn me_response_from_claims() {
        let mut claims = Claims::for_user("u1").with_exp(1700000000);
        claims.extra.insert("name".to_string(), json!("ada"));

        let response = MeResponse::from(claims);
        assert_eq!(response.id, "u1");
        assert_eq!(response.expires_at.as_deref(), Some("2023-11-14T22:13:20+00:00"));
        assert_eq!(response.claims["name"], "ada");
    }

    #[test]
    fn me_response_omits_missing_expiry() {
        let value = serde_json::to_value(MeResponse::from(Claims::for_user("u1"))).unwrap();
        assert_eq!(value, json!({"id": "u1", "claims": {}}));
    }
}
