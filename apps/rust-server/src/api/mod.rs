// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    error::ErrorBody,
    models::{MeResponse, ProfilePatch, UserProfile},
    state::AppState,
};

pub mod health;
pub mod users;

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(users::me))
        .route("/users/{id}", put(users::update_user).delete(users::delete_user))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let public = Router::new().route("/users/find/{id}", get(users::get_user));

    Router::new()
        .nest("/api", protected.merge(public))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// CORS policy: permissive without configured origins, otherwise only the
/// listed origins, with credentials so the auth cookie is sent.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

struct CookieAuth;

impl Modify for CookieAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                crate::auth::ACCESS_COOKIE_NAME,
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        users::me,
        users::update_user,
        users::delete_user,
        users::get_user
    ),
    components(
        schemas(
            UserProfile,
            ProfilePatch,
            MeResponse,
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&CookieAuth),
    tags(
        (name = "Health", description = "Liveness and health checks"),
        (name = "Users", description = "Account identity and profiles")
    )
)]
struct ApiDoc;
