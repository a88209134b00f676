// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cookie-carried HS256 tokens guard every account-scoped endpoint.
//!
//! ## Auth Flow
//!
//! 1. Sign-in (outside this service) sets the `access_token` cookie holding a
//!    token signed with the shared secret, payload `{ "id": <user id> }`
//! 2. [`require_auth`] reads the cookie:
//!    - absent → 401 `You are not authenticated`
//!    - bad signature, expired or malformed → 403 `Token is not valid!`
//! 3. The verified [`Claims`] are attached to the request and handlers read
//!    them through [`Auth`]
//! 4. Handlers that modify an account compare its id with `claims.id`
//!    through [`OwnershipEnforcer`]

pub mod claims;
pub mod cookie;
pub mod error;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod ownership;

pub use claims::Claims;
pub use cookie::{get_cookie, ACCESS_COOKIE_NAME};
pub use error::AuthError;
pub use extractor::Auth;
pub use jwt::{verify_token, JwtConfig, JwtError};
pub use middleware::{require_auth, AuthConfig};
pub use ownership::{OwnedResource, OwnershipEnforcer};
