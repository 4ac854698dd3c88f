//! Environment-variable snapshot and the `CEP_*` override layer.
use std::collections::BTreeMap;

use super::layer::{ConfigLayer, LifecycleLayer};
use crate::error::ConfigError;

/// Prefix shared by every variable the bundler reads.
pub const PREFIX: &str = "CEP_";

/// Prefix of per-host debug port variables (`CEP_DEBUG_PORT_PHXS=3001`).
pub const DEBUG_PORT_PREFIX: &str = "CEP_DEBUG_PORT_";

/// Overrides the bundle display name.
pub const BUNDLE_NAME: &str = "CEP_BUNDLE_NAME";
/// Overrides the bundle identifier.
pub const BUNDLE_ID: &str = "CEP_BUNDLE_ID";
/// Overrides the bundle version.
pub const BUNDLE_VERSION: &str = "CEP_BUNDLE_VERSION";
/// Overrides the host list.
pub const HOSTS: &str = "CEP_HOSTS";
/// Overrides the normal icon path.
pub const ICON_NORMAL: &str = "CEP_ICON_NORMAL";
/// Overrides the rollover icon path.
pub const ICON_ROLLOVER: &str = "CEP_ICON_ROLLOVER";
/// Overrides the dark-theme icon path.
pub const ICON_DARK_NORMAL: &str = "CEP_ICON_DARK_NORMAL";
/// Overrides the dark-theme rollover icon path.
pub const ICON_DARK_ROLLOVER: &str = "CEP_ICON_DARK_ROLLOVER";
/// Overrides the panel width.
pub const PANEL_WIDTH: &str = "CEP_PANEL_WIDTH";
/// Overrides the panel height.
pub const PANEL_HEIGHT: &str = "CEP_PANEL_HEIGHT";
/// A truthy value writes `.debug` in production builds.
pub const DEBUG_IN_PRODUCTION: &str = "CEP_DEBUG_IN_PRODUCTION";
/// Comma-separated CEF parameters.
pub const CEF_PARAMS: &str = "CEP_CEF_PARAMS";
/// A truthy value skips linking into the extensions folder.
pub const NO_SYMLINK: &str = "CEP_NO_SYMLINK";

/// Build environment fallback (`development`, `production`, ...).
pub const NODE_ENV: &str = "NODE_ENV";

/// Immutable copy of the process environment.
///
/// Captured once per invocation and passed explicitly, so resolution is a pure
/// function of its inputs and tests never have to mutate the real environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build a snapshot from explicit pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, treating an empty string as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(is_truthy)
    }

    fn number<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|raw| {
                raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    key: key.to_string(),
                    value: raw.to_string(),
                })
            })
            .transpose()
    }

    /// `CEP_DEBUG_PORT_<HOST>` entries keyed by host code.
    fn debug_ports(&self) -> Result<Option<BTreeMap<String, u16>>, ConfigError> {
        let mut ports = BTreeMap::new();
        for key in self.vars.keys() {
            let Some(host) = key.strip_prefix(DEBUG_PORT_PREFIX) else {
                continue;
            };
            if host.is_empty() {
                continue;
            }
            if let Some(port) = self.number(key)? {
                ports.insert(host.to_string(), port);
            }
        }
        Ok((!ports.is_empty()).then_some(ports))
    }

    /// The highest-priority configuration layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if a panel size or debug port
    /// variable is set but not an integer.
    pub fn config_layer(&self) -> Result<ConfigLayer, ConfigError> {
        Ok(ConfigLayer {
            bundle_name: self.string(BUNDLE_NAME),
            bundle_id: self.string(BUNDLE_ID),
            bundle_version: self.string(BUNDLE_VERSION),
            hosts: self.string(HOSTS),
            icon_normal: self.string(ICON_NORMAL),
            icon_rollover: self.string(ICON_ROLLOVER),
            icon_dark_normal: self.string(ICON_DARK_NORMAL),
            icon_dark_rollover: self.string(ICON_DARK_ROLLOVER),
            panel_width: self.number(PANEL_WIDTH)?,
            panel_height: self.number(PANEL_HEIGHT)?,
            debug_ports: self.debug_ports()?,
            debug_in_production: self.flag(DEBUG_IN_PRODUCTION),
            lifecycle: LifecycleLayer::default(),
            cef_params: self.get(CEF_PARAMS).map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            no_symlink: self.flag(NO_SYMLINK),
        })
    }
}

/// `1` or `true` (any case) is true; every other value is false.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
