// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Typed access to environment variables and an optional defaults bundle
//! ([`Env`]), plus the server's own settings ([`Settings`]) read through it at
//! startup.
//!
//! ## Environment Variables
//!
//! Every name below is read with the `VIDEO` prefix, e.g. `VIDEO_PORT`.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8800` |
//! | `JWT_SECRET` | Shared HS256 secret for access tokens | Required |
//! | `AUTH_COOKIE` | Cookie carrying the access token | `access_token` |
//! | `AUTH_REQUIRE_EXP` | Reject tokens without an `exp` claim | `false` |
//! | `AUTH_LEEWAY_SECS` | Clock skew tolerance for `exp` | `0` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `CORS_ORIGINS` | Allowed origins (JSON array or comma list) | permissive |
//! | `DEFAULTS_FILE` | JSON defaults bundle loaded before the above | none |
//!
//! `RUST_LOG` (unprefixed) sets the log filter, default `info,tower_http=debug`.

pub mod env;
pub mod error;
pub mod settings;

pub use env::{Env, EnvSnapshot, EnvSource, ProcessEnv};
pub use error::{ConfigError, ConfigResult};
pub use settings::{LogFormat, Settings};

/// Prefix applied to every server setting.
pub const ENV_PREFIX: &str = "VIDEO";

pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const JWT_SECRET: &str = "JWT_SECRET";
pub const AUTH_COOKIE: &str = "AUTH_COOKIE";
pub const AUTH_REQUIRE_EXP: &str = "AUTH_REQUIRE_EXP";
pub const AUTH_LEEWAY_SECS: &str = "AUTH_LEEWAY_SECS";
pub const LOG_FORMAT: &str = "LOG_FORMAT";
pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
pub const DEFAULTS_FILE: &str = "DEFAULTS_FILE";
