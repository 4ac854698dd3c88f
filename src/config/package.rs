//! `package.json` descriptor loading.
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::layer::{ConfigLayer, LifecycleLayer};
use crate::error::ConfigError;

/// The parts of a `package.json` the bundler reads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PackageDescriptor {
    /// npm package name.
    pub name: Option<String>,
    /// npm package version; the bundle version falls back to it.
    pub version: Option<String>,
    /// Runtime dependencies by package name; version specifiers are ignored.
    pub dependencies: BTreeMap<String, String>,
    /// Extension settings under the `cep` key.
    pub cep: Option<CepSection>,
}

/// A panel size or port given either as a JSON number or a numeric string.
///
/// Negative and fractional numbers deserialize so that they are reported as
/// [`ConfigError::InvalidNumber`] for their key rather than rejecting the
/// whole descriptor.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Number {
    /// A non-negative JSON integer.
    Int(u64),
    /// A negative JSON integer; never valid.
    Signed(i64),
    /// A JSON number with a fraction or exponent; never valid.
    Float(f64),
    /// A string holding the number.
    Text(String),
}

impl Number {
    fn parse<T: TryFrom<u64> + std::str::FromStr>(&self, key: &str) -> Result<T, ConfigError> {
        let invalid = || ConfigError::InvalidNumber {
            key: key.to_string(),
            value: match self {
                Self::Int(n) => n.to_string(),
                Self::Signed(n) => n.to_string(),
                Self::Float(n) => n.to_string(),
                Self::Text(s) => s.clone(),
            },
        };
        match self {
            Self::Int(n) => T::try_from(*n).map_err(|_| invalid()),
            Self::Signed(_) | Self::Float(_) => Err(invalid()),
            Self::Text(s) => s.trim().parse().map_err(|_| invalid()),
        }
    }
}

/// `cep.lifecycle` in `package.json`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LifecycleSection {
    /// `cep.lifecycle.autoVisible`.
    pub auto_visible: Option<bool>,
    /// `cep.lifecycle.startOnEvents`.
    pub start_on_events: Option<Vec<String>>,
}

/// `cep` in `package.json`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CepSection {
    /// Bundle display name.
    pub name: Option<String>,
    /// Bundle identifier.
    pub id: Option<String>,
    /// Bundle version.
    pub version: Option<String>,
    /// Host list string.
    pub hosts: Option<String>,
    /// Icon paths, relative to the project root.
    pub icon_normal: Option<String>,
    /// See [`Self::icon_normal`].
    pub icon_rollover: Option<String>,
    /// See [`Self::icon_normal`].
    pub icon_dark_normal: Option<String>,
    /// See [`Self::icon_normal`].
    pub icon_dark_rollover: Option<String>,
    /// Panel width in pixels.
    pub panel_width: Option<Number>,
    /// Panel height in pixels.
    pub panel_height: Option<Number>,
    /// Remote debugging port per host id.
    pub debug_ports: Option<BTreeMap<String, Number>>,
    /// Write `.debug` in production builds too.
    pub debug_in_production: Option<bool>,
    /// Panel lifecycle settings.
    pub lifecycle: Option<LifecycleSection>,
    /// Extra CEF command-line parameters.
    pub cef_params: Option<Vec<String>>,
    /// Skip linking into the extensions folder.
    pub no_symlink: Option<bool>,
}

impl CepSection {
    /// Convert to a configuration layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] for a panel size or port that is
    /// not a valid integer.
    pub fn to_layer(&self) -> Result<ConfigLayer, ConfigError> {
        let debug_ports = self
            .debug_ports
            .as_ref()
            .map(|ports| {
                ports
                    .iter()
                    .map(|(host, port)| {
                        Ok((host.clone(), port.parse::<u16>(&format!("cep.debugPorts.{host}"))?))
                    })
                    .collect::<Result<BTreeMap<_, _>, ConfigError>>()
            })
            .transpose()?;
        let lifecycle = self.lifecycle.clone().unwrap_or_default();

        Ok(ConfigLayer {
            bundle_name: self.name.clone(),
            bundle_id: self.id.clone(),
            bundle_version: self.version.clone(),
            hosts: self.hosts.clone(),
            icon_normal: self.icon_normal.clone(),
            icon_rollover: self.icon_rollover.clone(),
            icon_dark_normal: self.icon_dark_normal.clone(),
            icon_dark_rollover: self.icon_dark_rollover.clone(),
            panel_width: self
                .panel_width
                .as_ref()
                .map(|n| n.parse::<u32>("cep.panelWidth"))
                .transpose()?,
            panel_height: self
                .panel_height
                .as_ref()
                .map(|n| n.parse::<u32>("cep.panelHeight"))
                .transpose()?,
            debug_ports,
            debug_in_production: self.debug_in_production,
            lifecycle: LifecycleLayer {
                auto_visible: lifecycle.auto_visible,
                start_on_events: lifecycle.start_on_events,
            },
            cef_params: self.cef_params.clone(),
            no_symlink: self.no_symlink,
        })
    }
}

impl PackageDescriptor {
    /// Parse a descriptor from JSON text; `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPackage`] if the JSON is malformed.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::InvalidPackage {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::InvalidPackage`] if it is not a valid descriptor.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// The `cep` layer, empty when the key is absent.
    ///
    /// # Errors
    ///
    /// Propagates [`CepSection::to_layer`] errors.
    pub fn cep_layer(&self) -> Result<ConfigLayer, ConfigError> {
        self.cep
            .as_ref()
            .map_or_else(|| Ok(ConfigLayer::default()), CepSection::to_layer)
    }
}
