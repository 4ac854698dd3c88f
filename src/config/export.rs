//! Republish resolved settings as environment-style key/value pairs.
//!
//! Keys are converted from camelCase to `UPPER_SNAKE_CASE`. String values are
//! kept verbatim; everything else is JSON encoded. Nothing here touches the
//! process environment: callers attach the pairs to a child process with
//! [`EnvExport::apply`] or print them.
use std::process::Command;

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::CepConfig;

/// An ordered list of `(KEY, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvExport {
    pairs: Vec<(String, String)>,
}

impl EnvExport {
    /// Flatten the top-level fields of `value` into pairs.
    ///
    /// Non-object values produce an empty export.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized to JSON.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value).context("serializing configuration")?;
        let serde_json::Value::Object(map) = json else {
            return Ok(Self::default());
        };
        let pairs = map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (camel_to_upper_snake(&key), value)
            })
            .collect();
        Ok(Self { pairs })
    }

    /// The exported pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Value exported under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set every pair on `cmd`.
    pub fn apply<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.envs(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// `KEY=value` lines.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.pairs.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

/// Every resolved setting as `(UPPER_SNAKE_KEY, value)`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn to_env_pairs(config: &CepConfig) -> Result<EnvExport> {
    EnvExport::from_serialize(config)
}

/// `bundleId` -> `BUNDLE_ID`.
#[must_use]
pub fn camel_to_upper_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}
