//! Extension configuration: layered resolution, host parsing and export.
//!
//! Configuration is resolved once per build from four layers, highest
//! priority first:
//!
//! 1. `CEP_*` environment variables ([`env::EnvSnapshot`])
//! 2. the `cep` key of `package.json` ([`package::CepSection`])
//! 3. the `version` of `package.json` (bundle version only)
//! 4. built-in defaults ([`layer::ConfigLayer::defaults`])
pub mod env;
pub mod export;
pub mod hosts;
pub mod layer;
pub mod options;
pub mod package;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;
use env::EnvSnapshot;
use hosts::Host;
use layer::ConfigLayer;
use package::PackageDescriptor;

/// Fully resolved extension configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CepConfig {
    /// Display name and panel menu entry.
    pub bundle_name: String,
    /// Bundle identifier.
    pub bundle_id: String,
    /// Bundle version.
    pub bundle_version: String,
    /// Raw host list; see [`CepConfig::host_list`].
    pub hosts: String,
    /// Icon paths.
    #[serde(flatten)]
    pub icons: Icons,
    /// Panel width in pixels.
    pub panel_width: u32,
    /// Panel height in pixels.
    pub panel_height: u32,
    /// Remote-debugging port per host code.
    pub debug_ports: BTreeMap<String, u16>,
    /// Write the `.debug` descriptor in production builds too.
    pub debug_in_production: bool,
    /// Panel visibility and start-up triggers.
    pub lifecycle: Lifecycle,
    /// Command-line flags for the embedded browser runtime.
    pub cef_params: Vec<String>,
    /// Never link the build into the host extensions folder.
    pub no_symlink: bool,
}

impl CepConfig {
    /// Parsed host list.
    #[must_use]
    pub fn host_list(&self) -> Vec<Host> {
        hosts::parse_hosts(&self.hosts)
    }
}

/// Panel visibility and start-up triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    /// Show the panel as soon as the host starts it.
    pub auto_visible: bool,
    /// Host events that start the panel.
    pub start_on_events: Vec<String>,
}

/// Icon paths relative to the project root, one per visual state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Icons {
    /// Default icon.
    #[serde(rename = "iconNormal", skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    /// Icon under the pointer.
    #[serde(rename = "iconRollover", skip_serializing_if = "Option::is_none")]
    pub rollover: Option<String>,
    /// Icon for dark host themes.
    #[serde(rename = "iconDarkNormal", skip_serializing_if = "Option::is_none")]
    pub dark_normal: Option<String>,
    /// Icon under the pointer on dark host themes.
    #[serde(rename = "iconDarkRollover", skip_serializing_if = "Option::is_none")]
    pub dark_rollover: Option<String>,
}

/// Visual state an icon is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSlot {
    Normal,
    RollOver,
    DarkNormal,
    DarkRollOver,
}

impl fmt::Display for IconSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Spelling matches the manifest's `Icon/@Type` attribute.
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::RollOver => write!(f, "RollOver"),
            Self::DarkNormal => write!(f, "DarkNormal"),
            Self::DarkRollOver => write!(f, "DarkRollOver"),
        }
    }
}

impl Icons {
    /// Configured icons in manifest order, skipping unset slots.
    pub fn slots(&self) -> impl Iterator<Item = (IconSlot, &str)> {
        [
            (IconSlot::Normal, &self.normal),
            (IconSlot::RollOver, &self.rollover),
            (IconSlot::DarkNormal, &self.dark_normal),
            (IconSlot::DarkRollOver, &self.dark_rollover),
        ]
        .into_iter()
        .filter_map(|(slot, path)| path.as_deref().map(|p| (slot, p)))
    }
}

/// Resolve the configuration for `pkg` under the environment `env`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidNumber`] if a numeric setting in either the
/// environment or `package.json` is not a valid integer.
pub fn get_config(pkg: &PackageDescriptor, env: &EnvSnapshot) -> Result<CepConfig, ConfigError> {
    Ok(ConfigLayer::resolve([
        env.config_layer()?,
        pkg.cep_layer()?,
        ConfigLayer::version_only(pkg.version.clone()),
    ]))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::Path;

    fn pkg(json: &str) -> PackageDescriptor {
        PackageDescriptor::from_json(json, Path::new("package.json")).unwrap()
    }

    #[test]
    fn environment_beats_package_beats_defaults() {
        let pkg = pkg(r#"{ "cep": { "id": "com.pkg", "name": "Pkg Panel" } }"#);
        let env = EnvSnapshot::from_pairs([(env::BUNDLE_ID, "com.env")]);
        let config = get_config(&pkg, &env).unwrap();
        assert_eq!(config.bundle_id, "com.env");
        assert_eq!(config.bundle_name, "Pkg Panel");
        assert_eq!(config.hosts, "*");
    }

    #[test]
    fn package_version_is_the_last_resort_for_bundle_version() {
        let env = EnvSnapshot::default();

        let config = get_config(&pkg(r#"{ "version": "1.4.0" }"#), &env).unwrap();
        assert_eq!(config.bundle_version, "1.4.0");

        let config = get_config(
            &pkg(r#"{ "version": "1.4.0", "cep": { "version": "2.0.0" } }"#),
            &env,
        )
        .unwrap();
        assert_eq!(config.bundle_version, "2.0.0");

        let env = EnvSnapshot::from_pairs([(env::BUNDLE_VERSION, "3.0.0")]);
        let config = get_config(
            &pkg(r#"{ "version": "1.4.0", "cep": { "version": "2.0.0" } }"#),
            &env,
        )
        .unwrap();
        assert_eq!(config.bundle_version, "3.0.0");
    }

    #[test]
    fn no_cep_key_yields_defaults() {
        let config = get_config(&pkg("{}"), &EnvSnapshot::default()).unwrap();
        assert_eq!(config.bundle_id, layer::DEFAULT_BUNDLE_ID);
        assert_eq!(config.bundle_version, layer::DEFAULT_BUNDLE_VERSION);
    }

    #[test]
    fn environment_debug_flag_overrides_package() {
        let pkg = pkg(r#"{ "cep": { "debugInProduction": true } }"#);
        let config = get_config(&pkg, &EnvSnapshot::default()).unwrap();
        assert!(config.debug_in_production);

        let env = EnvSnapshot::from_pairs([(env::DEBUG_IN_PRODUCTION, "0")]);
        let config = get_config(&pkg, &env).unwrap();
        assert!(!config.debug_in_production);
    }

    #[test]
    fn host_list_parses_raw_hosts() {
        let pkg = pkg(r#"{ "cep": { "hosts": "PPRO@[12.0,99.9], AEFT" } }"#);
        let config = get_config(&pkg, &EnvSnapshot::default()).unwrap();
        let hosts = config.host_list();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].version_range, "[12.0,99.9]");
    }

    #[test]
    fn icon_slots_skip_unset_entries() {
        let icons = Icons {
            normal: Some("a.png".to_string()),
            rollover: None,
            dark_normal: None,
            dark_rollover: Some("d.png".to_string()),
        };
        let slots: Vec<(IconSlot, &str)> = icons.slots().collect();
        assert_eq!(
            slots,
            vec![
                (IconSlot::Normal, "a.png"),
                (IconSlot::DarkRollOver, "d.png")
            ]
        );
        assert_eq!(Icons::default().slots().count(), 0);
    }

    #[test]
    fn icon_slot_display_matches_manifest_types() {
        assert_eq!(IconSlot::RollOver.to_string(), "RollOver");
        assert_eq!(IconSlot::DarkNormal.to_string(), "DarkNormal");
    }
}
