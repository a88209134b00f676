// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server settings read once at startup.

use std::net::SocketAddr;

use serde_json::Value;

use super::env::Env;
use super::error::{ConfigError, ConfigResult};
use super::{
    AUTH_COOKIE, AUTH_LEEWAY_SECS, AUTH_REQUIRE_EXP, CORS_ORIGINS, HOST, JWT_SECRET, LOG_FORMAT,
    PORT,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8800;
pub const DEFAULT_COOKIE_NAME: &str = "access_token";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(key: &str, value: &str) -> ConfigResult<Self> {
        match value.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{other}' is not a log format (expected `pretty` or `json`)"),
            }),
        }
    }
}

/// Typed runtime parameters of the server.
#[derive(Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Shared HS256 secret. Never logged.
    pub jwt_secret: String,
    pub cookie_name: String,
    pub require_exp: bool,
    pub leeway_secs: u64,
    pub log_format: LogFormat,
    /// Allowed CORS origins; empty means permissive.
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Reads every setting through `env`.
    ///
    /// # Errors
    /// Returns an error if the JWT secret is missing or empty, or if any
    /// value has the wrong type or is out of range.
    pub fn load(env: &Env) -> ConfigResult<Self> {
        let host = env
            .get_string(HOST, Some(DEFAULT_HOST.to_string()))?
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = env
            .get_int(PORT, Some(i64::from(DEFAULT_PORT)))?
            .unwrap_or(i64::from(DEFAULT_PORT));
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: env.qualified_key(PORT),
                message: format!("'{port}' is not a valid port number (must be 1-65535)"),
            })?;

        let jwt_secret = env
            .get_string(JWT_SECRET, None)?
            .ok_or_else(|| ConfigError::MissingValue {
                key: env.qualified_key(JWT_SECRET),
            })?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: env.qualified_key(JWT_SECRET),
                message: "must not be empty".to_string(),
            });
        }

        let cookie_name = env
            .get_string(AUTH_COOKIE, None)?
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());

        let require_exp = env
            .get_boolean(AUTH_REQUIRE_EXP, Some(false))?
            .unwrap_or(false);

        let leeway = env.get_int(AUTH_LEEWAY_SECS, Some(0))?.unwrap_or(0);
        let leeway_secs = u64::try_from(leeway).map_err(|_| ConfigError::InvalidValue {
            key: env.qualified_key(AUTH_LEEWAY_SECS),
            message: format!("'{leeway}' must not be negative"),
        })?;

        let log_format = match env.get_string(LOG_FORMAT, None)? {
            Some(value) => LogFormat::parse(&env.qualified_key(LOG_FORMAT), &value)?,
            None => LogFormat::default(),
        };

        let cors_origins = env
            .get_array(CORS_ORIGINS, None)?
            .unwrap_or_default()
            .into_iter()
            .filter_map(|origin| match origin {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            jwt_secret,
            cookie_name,
            require_exp,
            leeway_secs,
            log_format,
            cors_origins,
        })
    }

    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns an error if `host` is not an IP address.
    pub fn bind_addr(&self) -> ConfigResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: HOST.to_string(),
                message: format!("'{}' is not a bindable address", self.host),
            })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("cookie_name", &self.cookie_name)
            .field("require_exp", &self.require_exp)
            .field("leeway_secs", &self.leeway_secs)
            .field("log_format", &self.log_format)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvSnapshot, ENV_PREFIX};

    fn env(vars: EnvSnapshot) -> Env {
        Env::with_source(vars).prefix(ENV_PREFIX)
    }

    fn secret_only() -> EnvSnapshot {
        EnvSnapshot::new().with("VIDEO_JWT_SECRET", "s3cret")
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let settings = Settings::load(&env(secret_only())).unwrap();

        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.jwt_secret, "s3cret");
        assert_eq!(settings.cookie_name, DEFAULT_COOKIE_NAME);
        assert!(!settings.require_exp);
        assert_eq!(settings.leeway_secs, 0);
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(settings.cors_origins.is_empty());
    }

    #[test]
    fn reads_every_override() {
        let vars = EnvSnapshot::new()
            .with("VIDEO_HOST", "127.0.0.1")
            .with("VIDEO_PORT", "3000")
            .with("VIDEO_JWT_SECRET", "s3cret")
            .with("VIDEO_AUTH_COOKIE", "session")
            .with("VIDEO_AUTH_REQUIRE_EXP", "on")
            .with("VIDEO_AUTH_LEEWAY_SECS", "30")
            .with("VIDEO_LOG_FORMAT", "JSON")
            .with("VIDEO_CORS_ORIGINS", "http://localhost:3000, https://tube.example");

        let settings = Settings::load(&env(vars)).unwrap();

        assert_eq!(settings.bind_addr().unwrap().to_string(), "127.0.0.1:3000");
        assert_eq!(settings.cookie_name, "session");
        assert!(settings.require_exp);
        assert_eq!(settings.leeway_secs, 30);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(
            settings.cors_origins,
            vec!["http://localhost:3000".to_string(), "https://tube.example".to_string()]
        );
    }

    #[test]
    fn missing_secret_fails() {
        let err = Settings::load(&env(EnvSnapshot::new())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { ref key } if key == "VIDEO_JWT_SECRET"));
    }

    #[test]
    fn empty_secret_fails() {
        let vars = EnvSnapshot::new().with("VIDEO_JWT_SECRET", "");
        let err = Settings::load(&env(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn out_of_range_port_fails() {
        for port in ["0", "70000", "-1"] {
            let vars = EnvSnapshot::new()
                .with("VIDEO_JWT_SECRET", "s3cret")
                .with("VIDEO_PORT", port);
            let err = Settings::load(&env(vars)).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{port}");
        }
    }

    #[test]
    fn non_numeric_port_is_a_conversion_error() {
        let vars = EnvSnapshot::new()
            .with("VIDEO_JWT_SECRET", "s3cret")
            .with("VIDEO_PORT", "eighty");
        let err = Settings::load(&env(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::TypeConversion { .. }));
    }

    #[test]
    fn unknown_log_format_fails() {
        let vars = EnvSnapshot::new()
            .with("VIDEO_JWT_SECRET", "s3cret")
            .with("VIDEO_LOG_FORMAT", "xml");
        assert!(Settings::load(&env(vars)).is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let settings = Settings::load(&env(secret_only())).unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
