// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{
    auth::{Auth, OwnershipEnforcer},
    error::ApiError,
    models::{MeResponse, ProfilePatch, UserProfile},
    state::AppState,
};

const UPDATE_DENIED: &str = "You can update only your account";
const DELETE_DENIED: &str = "You can delete only your account!";
const DELETED: &str = "the user has been deleted!";

/// Get the identity carried by the caller's access token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Users",
    security(("cookie" = [])),
    responses(
        (status = 200, description = "Authenticated identity", body = MeResponse),
        (status = 401, description = "No access token", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid access token", body = crate::error::ErrorBody),
    )
)]
pub async fn me(Auth(claims): Auth) -> Json<MeResponse> {
    Json(claims.into())
}

/// Update the caller's own profile.
///
/// Every member of the body is set on the profile; other fields are kept.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("cookie" = [])),
    params(("id" = String, Path, description = "Account identifier")),
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Body is not a JSON object", body = crate::error::ErrorBody),
        (status = 401, description = "No access token", body = crate::error::ErrorBody),
        (status = 403, description = "Not the account owner", body = crate::error::ErrorBody),
    )
)]
pub async fn update_user(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<UserProfile>, ApiError> {
    let Value::Object(patch) = body else {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    };

    let mut store = state.store.write().await;
    id.verify_ownership(&claims, UPDATE_DENIED)?;
    let profile = store.update_user(&id, patch);

    tracing::info!(user_id = %id, "Updated user profile");
    Ok(Json(profile))
}

/// Delete the caller's own account.
///
/// Replies with a bare JSON string.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("cookie" = [])),
    params(("id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account deleted", body = String),
        (status = 401, description = "No access token", body = crate::error::ErrorBody),
        (status = 403, description = "Not the account owner", body = crate::error::ErrorBody),
        (status = 404, description = "Account not found", body = crate::error::ErrorBody),
    )
)]
pub async fn delete_user(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    let mut store = state.store.write().await;
    claims.ensure_owner(&id, DELETE_DENIED)?;
    store.delete_user(&id)?;

    tracing::info!(user_id = %id, "Deleted user");
    Ok(Json(DELETED))
}

/// Find a profile by account identifier.
#[utoipa::path(
    get,
    path = "/api/users/find/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 404, description = "Account not found", body = crate::error::ErrorBody),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.get_user(&id)?))
}
