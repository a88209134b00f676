// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed environment accessor.
//!
//! [`Env`] resolves a configuration key against two sources, in order:
//!
//! 1. the defaults bundle registered with [`Env::load_defaults`]
//! 2. the injected [`EnvSource`] (the live process environment by default)
//!
//! The first source that defines the key wins. If neither does, the caller's
//! default is returned, and failing that the absent sentinel `Ok(None)`.
//! Presence is explicit: a defined `"0"`, `"false"` or `""` is a value and is
//! never replaced by the caller's default.
//!
//! ## Error policy
//!
//! In strict mode (the default) a failed `int`/`float` coercion or a failed
//! bundle load is returned as a [`ConfigError`]. After [`Env::quiet`] every
//! such failure degrades to `Ok(None)` (lookups) or `Ok(())` (loads).
//! Boolean and array coercion never fail.
//!
//! ```rust,ignore
//! let mut env = Env::new().prefix("VIDEO");
//! env.load_defaults("/etc/video/defaults.json").await?;
//! let port = env.get_int("PORT", Some(8800))?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_json::Value;

use super::error::{ConfigError, ConfigResult};

/// Name of the member a defaults bundle must expose.
pub const DEFAULTS_EXPORT: &str = "defaults";

const TRUE_WORDS: [&str; 5] = ["true", "yes", "y", "1", "on"];
const FALSE_WORDS: [&str; 5] = ["false", "no", "n", "0", "off"];

/// Read access to environment variables.
///
/// Values at the OS boundary are always strings. Implementations must not
/// cache between calls unless they are snapshots by construction.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `key`, or `None` if it is not defined.
    fn var(&self, key: &str) -> Option<String>;
}

/// The live process environment, read on every lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        // Non-unicode values are treated as undefined.
        std::env::var(key).ok()
    }
}

/// A fixed set of environment variables.
#[derive(Debug, Default, Clone)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for EnvSnapshot {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl From<HashMap<String, String>> for EnvSnapshot {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Typed configuration accessor over a defaults bundle and an environment.
pub struct Env {
    prefix: String,
    prefix_separator: String,
    defaults: HashMap<String, Value>,
    throw_on_error: bool,
    source: Box<dyn EnvSource>,
}

impl Env {
    /// Accessor over the live process environment.
    pub fn new() -> Self {
        Self::with_source(ProcessEnv)
    }

    /// Accessor over an injected environment source.
    pub fn with_source(source: impl EnvSource + 'static) -> Self {
        Self {
            prefix: String::new(),
            prefix_separator: "_".to_string(),
            defaults: HashMap::new(),
            throw_on_error: true,
            source: Box::new(source),
        }
    }

    /// Namespaces every lookup as `{prefix}{separator}{name}`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix_separator(mut self, separator: impl Into<String>) -> Self {
        self.prefix_separator = separator.into();
        self
    }

    /// Stops this accessor from returning errors.
    ///
    /// Conversion failures yield `Ok(None)` and failed loads leave the
    /// current defaults untouched.
    pub fn quiet(mut self) -> Self {
        self.throw_on_error = false;
        self
    }

    pub fn is_quiet(&self) -> bool {
        !self.throw_on_error
    }

    /// Number of keys in the registered defaults bundle.
    pub fn defaults_len(&self) -> usize {
        self.defaults.len()
    }

    /// Loads a defaults bundle from a JSON file.
    ///
    /// The file must hold an object with a non-empty `defaults` object. On
    /// success the previous defaults are replaced, not merged.
    ///
    /// # Errors
    /// - [`ConfigError::ModuleNotFound`] if the file cannot be read
    /// - [`ConfigError::InvalidModuleStructure`] if it is not JSON or has no
    ///   `defaults` object
    /// - [`ConfigError::EmptyModule`] if `defaults` has no entries
    pub async fn load_defaults(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        match read_bundle(path).await {
            Ok(defaults) => {
                tracing::debug!(
                    path = %path.display(),
                    keys = defaults.len(),
                    "Loaded configuration defaults"
                );
                self.defaults = defaults;
                Ok(())
            }
            Err(err) if self.throw_on_error => Err(err),
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring defaults load failure (quiet)");
                Ok(())
            }
        }
    }

    /// Returns the value as a string.
    pub fn get_string(&self, name: &str, default: Option<String>) -> ConfigResult<Option<String>> {
        self.typed(name, default, |_, raw| Ok(coerce_string(raw)))
    }

    /// Returns the value as a base-10 integer.
    ///
    /// # Errors
    /// [`ConfigError::TypeConversion`] if the value is not an integer (strict mode).
    pub fn get_int(&self, name: &str, default: Option<i64>) -> ConfigResult<Option<i64>> {
        self.typed(name, default, coerce_int)
    }

    /// Returns the value as a finite float.
    ///
    /// # Errors
    /// [`ConfigError::TypeConversion`] if the value is not a number (strict mode).
    pub fn get_float(&self, name: &str, default: Option<f64>) -> ConfigResult<Option<f64>> {
        self.typed(name, default, coerce_float)
    }

    /// Returns the value as a boolean.
    ///
    /// `true`, `yes`, `y`, `1`, `on` are true and `false`, `no`, `n`, `0`,
    /// `off` are false, case-insensitively. Any other text is `false`.
    pub fn get_boolean(&self, name: &str, default: Option<bool>) -> ConfigResult<Option<bool>> {
        self.typed(name, default, |_, raw| Ok(coerce_boolean(raw)))
    }

    /// Returns the value as a sequence.
    ///
    /// Arrays in the defaults bundle pass through. Text is parsed as a JSON
    /// array, or else split on `,`.
    pub fn get_array(
        &self,
        name: &str,
        default: Option<Vec<Value>>,
    ) -> ConfigResult<Option<Vec<Value>>> {
        self.typed(name, default, |_, raw| Ok(coerce_array(raw)))
    }

    /// The full key `name` is looked up under.
    pub fn qualified_key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.prefix, self.prefix_separator, name)
        }
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.defaults.get(key).filter(|v| !v.is_null()) {
            return Some(value.clone());
        }
        self.source.var(key).map(Value::String)
    }

    fn typed<T>(
        &self,
        name: &str,
        default: Option<T>,
        coerce: impl FnOnce(&str, Value) -> ConfigResult<T>,
    ) -> ConfigResult<Option<T>> {
        let key = self.qualified_key(name);
        let Some(raw) = self.lookup(&key) else {
            return Ok(default);
        };

        match coerce(&key, raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.throw_on_error => {
                tracing::warn!(key = %key, error = %err, "Configuration value rejected");
                Err(err)
            }
            Err(err) => {
                tracing::debug!(key = %key, error = %err, "Ignoring configuration value (quiet)");
                Ok(None)
            }
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("prefix", &self.prefix)
            .field("prefix_separator", &self.prefix_separator)
            .field("defaults", &self.defaults.len())
            .field("throw_on_error", &self.throw_on_error)
            .finish_non_exhaustive()
    }
}

async fn read_bundle(path: &Path) -> ConfigResult<HashMap<String, Value>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::ModuleNotFound {
            path: path.to_path_buf(),
            source,
        })?;

    let structure = |reason: String| ConfigError::InvalidModuleStructure {
        path: path.to_path_buf(),
        reason,
    };

    let document: Value =
        serde_json::from_str(&content).map_err(|e| structure(format!("not valid JSON: {e}")))?;

    let Value::Object(mut document) = document else {
        return Err(structure("top level is not an object".to_string()));
    };

    let defaults = match document.remove(DEFAULTS_EXPORT) {
        Some(Value::Object(map)) => map,
        Some(_) => return Err(structure(format!("`{DEFAULTS_EXPORT}` is not an object"))),
        None => return Err(structure(format!("missing `{DEFAULTS_EXPORT}` export"))),
    };

    if defaults.is_empty() {
        return Err(ConfigError::EmptyModule {
            path: path.to_path_buf(),
        });
    }

    Ok(defaults.into_iter().collect())
}

/// Renders a raw value as the text it would have in an environment variable.
fn raw_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn coerce_string(raw: Value) -> String {
    match raw {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn coerce_int(key: &str, raw: Value) -> ConfigResult<i64> {
    let parsed = match &raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ConfigError::conversion(key, "int", raw_text(&raw)))
}

fn coerce_float(key: &str, raw: Value) -> ConfigResult<f64> {
    let parsed = match &raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| ConfigError::conversion(key, "float", raw_text(&raw)))
}

fn coerce_boolean(raw: Value) -> bool {
    if let Value::Bool(b) = raw {
        return b;
    }
    let text = raw_text(&raw).trim().to_lowercase();
    match text.as_str() {
        t if TRUE_WORDS.contains(&t) => true,
        t if FALSE_WORDS.contains(&t) => false,
        t => {
            tracing::debug!(value = %t, "Unrecognized boolean text, reading as false");
            false
        }
    }
}

fn coerce_array(raw: Value) -> Vec<Value> {
    let text = match raw {
        Value::Array(items) => return items,
        Value::String(s) => s,
        other => other.to_string(),
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => items,
        _ => text
            .split(',')
            .map(|part| Value::String(part.to_string()))
            .collect(),
    }
}
