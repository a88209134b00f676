// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration loading and typed lookups.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The defaults bundle could not be located or read.
    #[error("Cannot find Module: {path}")]
    ModuleNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The defaults bundle does not expose a `defaults` object.
    #[error("Module Structure wrong: {path}: {reason}")]
    InvalidModuleStructure { path: PathBuf, reason: String },

    /// The `defaults` object of the bundle has no entries.
    #[error("Module has no Keys: {path}")]
    EmptyModule { path: PathBuf },

    /// A raw value could not be coerced to the requested type.
    #[error("Cannot convert types error: {key}={value:?} is not a valid {target}")]
    TypeConversion {
        key: String,
        target: &'static str,
        value: String,
    },

    /// A required value is absent from every source.
    #[error("missing required configuration value: {key}")]
    MissingValue { key: String },

    /// A value was read and typed but is outside the accepted range.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub(crate) fn conversion(key: &str, target: &'static str, value: impl Into<String>) -> Self {
        ConfigError::TypeConversion {
            key: key.to_string(),
            target,
            value: value.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
