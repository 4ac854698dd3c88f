//! Partial configuration layers and their merge rules.
//!
//! Every field is optional. Scalars take the first value that is present,
//! nested structures merge field by field (or key by key for maps), so a
//! higher layer that only sets `lifecycle.autoVisible` keeps the lower
//! layer's `startOnEvents`.
use std::collections::BTreeMap;

use super::{CepConfig, Icons, Lifecycle};

/// Default bundle display name.
pub const DEFAULT_BUNDLE_NAME: &str = "Parcel CEP Extension";
/// Default bundle identifier.
pub const DEFAULT_BUNDLE_ID: &str = "com.mycompany.myextension";
/// Default bundle version.
pub const DEFAULT_BUNDLE_VERSION: &str = "0.0.1";
/// Default host specification: every known host at any version.
pub const DEFAULT_HOSTS: &str = "*";
/// Default panel width and height in pixels.
pub const DEFAULT_PANEL_SIZE: u32 = 500;
/// Default command-line flags for the embedded browser runtime.
pub const DEFAULT_CEF_PARAMS: [&str; 4] = [
    "--allow-file-access-from-files",
    "--allow-file-access",
    "--enable-nodejs",
    "--mixed-context",
];
/// Default remote-debugging ports by host code.
pub const DEFAULT_DEBUG_PORTS: [(&str, u16); 12] = [
    ("PHXS", 3001),
    ("IDSN", 3002),
    ("AICY", 3003),
    ("ILST", 3004),
    ("PPRO", 3005),
    ("PRLD", 3006),
    ("AEFT", 3007),
    ("FLPR", 3008),
    ("AUDT", 3009),
    ("DRWV", 3010),
    ("MUST", 3011),
    ("KBRG", 3012),
];

/// Partially specified lifecycle settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleLayer {
    /// Show the panel as soon as the host starts it.
    pub auto_visible: Option<bool>,
    /// Host events that start the panel.
    pub start_on_events: Option<Vec<String>>,
}

impl LifecycleLayer {
    /// Fill every field missing here from `lower`.
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        Self {
            auto_visible: self.auto_visible.or(lower.auto_visible),
            start_on_events: self.start_on_events.or(lower.start_on_events),
        }
    }
}

/// One source of configuration values (environment, `package.json`, defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Display name; also the panel menu entry.
    pub bundle_name: Option<String>,
    /// Bundle identifier; names the extension link.
    pub bundle_id: Option<String>,
    /// Bundle version written to the manifest.
    pub bundle_version: Option<String>,
    /// Unparsed host list, e.g. `PPRO@[12.0,99.9], AEFT`.
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
    pub panel_width: Option<u32>,
    /// Panel height in pixels.
    pub panel_height: Option<u32>,
    /// Remote debugging port per host id.
    pub debug_ports: Option<BTreeMap<String, u16>>,
    /// Write `.debug` for production builds too.
    pub debug_in_production: Option<bool>,
    /// Lifecycle settings; merged field by field.
    pub lifecycle: LifecycleLayer,
    /// Extra CEF command-line parameters.
    pub cef_params: Option<Vec<String>>,
    /// Skip linking into the extensions folder.
    pub no_symlink: Option<bool>,
}

impl ConfigLayer {
    /// The built-in defaults; every field is set.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            bundle_name: Some(DEFAULT_BUNDLE_NAME.to_string()),
            bundle_id: Some(DEFAULT_BUNDLE_ID.to_string()),
            bundle_version: Some(DEFAULT_BUNDLE_VERSION.to_string()),
            hosts: Some(DEFAULT_HOSTS.to_string()),
            icon_normal: None,
            icon_rollover: None,
            icon_dark_normal: None,
            icon_dark_rollover: None,
            panel_width: Some(DEFAULT_PANEL_SIZE),
            panel_height: Some(DEFAULT_PANEL_SIZE),
            debug_ports: Some(
                DEFAULT_DEBUG_PORTS
                    .iter()
                    .map(|(host, port)| ((*host).to_string(), *port))
                    .collect(),
            ),
            debug_in_production: Some(false),
            lifecycle: LifecycleLayer {
                auto_visible: Some(true),
                start_on_events: Some(Vec::new()),
            },
            cef_params: Some(DEFAULT_CEF_PARAMS.iter().map(|p| (*p).to_string()).collect()),
            no_symlink: Some(false),
        }
    }

    /// A layer that only carries a bundle version (the `package.json` `version`).
    #[must_use]
    pub fn version_only(version: Option<String>) -> Self {
        Self {
            bundle_version: version,
            ..Self::default()
        }
    }

    /// Fill every field missing here from `lower`.
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        Self {
            bundle_name: self.bundle_name.or(lower.bundle_name),
            bundle_id: self.bundle_id.or(lower.bundle_id),
            bundle_version: self.bundle_version.or(lower.bundle_version),
            hosts: self.hosts.or(lower.hosts),
            icon_normal: self.icon_normal.or(lower.icon_normal),
            icon_rollover: self.icon_rollover.or(lower.icon_rollover),
            icon_dark_normal: self.icon_dark_normal.or(lower.icon_dark_normal),
            icon_dark_rollover: self.icon_dark_rollover.or(lower.icon_dark_rollover),
            panel_width: self.panel_width.or(lower.panel_width),
            panel_height: self.panel_height.or(lower.panel_height),
            debug_ports: merge_ports(self.debug_ports, lower.debug_ports),
            debug_in_production: self.debug_in_production.or(lower.debug_in_production),
            lifecycle: self.lifecycle.or(lower.lifecycle),
            cef_params: self.cef_params.or(lower.cef_params),
            no_symlink: self.no_symlink.or(lower.no_symlink),
        }
    }

    /// Merge `layers` (highest priority first) over the defaults.
    #[must_use]
    pub fn resolve(layers: impl IntoIterator<Item = Self>) -> CepConfig {
        let merged = layers
            .into_iter()
            .fold(Self::default(), Self::or)
            .or(Self::defaults());
        merged.into_config()
    }

    /// Convert a fully merged layer into a config; unset fields fall back to
    /// the same defaults [`ConfigLayer::defaults`] provides.
    fn into_config(self) -> CepConfig {
        CepConfig {
            bundle_name: self
                .bundle_name
                .unwrap_or_else(|| DEFAULT_BUNDLE_NAME.to_string()),
            bundle_id: self
                .bundle_id
                .unwrap_or_else(|| DEFAULT_BUNDLE_ID.to_string()),
            bundle_version: self
                .bundle_version
                .unwrap_or_else(|| DEFAULT_BUNDLE_VERSION.to_string()),
            hosts: self.hosts.unwrap_or_else(|| DEFAULT_HOSTS.to_string()),
            icons: Icons {
                normal: self.icon_normal,
                rollover: self.icon_rollover,
                dark_normal: self.icon_dark_normal,
                dark_rollover: self.icon_dark_rollover,
            },
            panel_width: self.panel_width.unwrap_or(DEFAULT_PANEL_SIZE),
            panel_height: self.panel_height.unwrap_or(DEFAULT_PANEL_SIZE),
            debug_ports: self.debug_ports.unwrap_or_default(),
            debug_in_production: self.debug_in_production.unwrap_or(false),
            lifecycle: Lifecycle {
                auto_visible: self.lifecycle.auto_visible.unwrap_or(true),
                start_on_events: self.lifecycle.start_on_events.unwrap_or_default(),
            },
            cef_params: self.cef_params.unwrap_or_default(),
            no_symlink: self.no_symlink.unwrap_or(false),
        }
    }
}

/// Key-wise merge: entries from `higher` win, missing keys come from `lower`.
fn merge_ports(
    higher: Option<BTreeMap<String, u16>>,
    lower: Option<BTreeMap<String, u16>>,
) -> Option<BTreeMap<String, u16>> {
    match (higher, lower) {
        (Some(mut high), Some(low)) => {
            for (host, port) in low {
                high.entry(host).or_insert(port);
            }
            Some(high)
        }
        (high, low) => high.or(low),
    }
}
