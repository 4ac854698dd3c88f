//! `CSXS/manifest.xml` renderer.
use std::fmt::Write as _;

use super::escape;
use crate::config::CepConfig;
use crate::config::hosts::Host;

/// CSXS runtime version the manifest targets.
pub const CSXS_VERSION: &str = "6.0";

/// Render the extension manifest for `config`, listing `hosts`.
///
/// Icon slots without a path are left out.
#[must_use]
pub fn render_manifest(config: &CepConfig, hosts: &[Host]) -> String {
    let id = escape(&config.bundle_id);
    let name = escape(&config.bundle_name);
    let version = escape(&config.bundle_version);

    let mut xml = String::new();
    let _ = writeln!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#
    );
    let _ = writeln!(
        xml,
        r#"<ExtensionManifest xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" ExtensionBundleId="{id}" ExtensionBundleName="{name}" ExtensionBundleVersion="{version}" Version="{CSXS_VERSION}">"#
    );
    let _ = writeln!(xml, "  <ExtensionList>");
    let _ = writeln!(xml, r#"    <Extension Id="{id}" Version="{version}"/>"#);
    let _ = writeln!(xml, "  </ExtensionList>");
    let _ = writeln!(xml, "  <ExecutionEnvironment>");
    let _ = writeln!(xml, "    <HostList>");
    for host in hosts {
        let _ = writeln!(
            xml,
            r#"      <Host Name="{}" Version="{}" />"#,
            escape(&host.name),
            escape(&host.version_range)
        );
    }
    let _ = writeln!(xml, "    </HostList>");
    let _ = writeln!(xml, "    <LocaleList>");
    let _ = writeln!(xml, r#"      <Locale Code="All"/>"#);
    let _ = writeln!(xml, "    </LocaleList>");
    let _ = writeln!(xml, "    <RequiredRuntimeList>");
    let _ = writeln!(
        xml,
        r#"      <RequiredRuntime Name="CSXS" Version="{CSXS_VERSION}"/>"#
    );
    let _ = writeln!(xml, "    </RequiredRuntimeList>");
    let _ = writeln!(xml, "  </ExecutionEnvironment>");
    let _ = writeln!(xml, "  <DispatchInfoList>");
    let _ = writeln!(xml, r#"    <Extension Id="{id}">"#);
    let _ = writeln!(xml, "      <DispatchInfo>");
    let _ = writeln!(xml, "        <Resources>");
    let _ = writeln!(xml, "          <MainPath>./panel.html</MainPath>");
    let _ = writeln!(xml, "          <CEFCommandLine>");
    for param in &config.cef_params {
        let _ = writeln!(xml, "            <Parameter>{}</Parameter>", escape(param));
    }
    let _ = writeln!(xml, "          </CEFCommandLine>");
    let _ = writeln!(xml, "        </Resources>");
    let _ = writeln!(xml, "        <Lifecycle>");
    let _ = writeln!(
        xml,
        "          <AutoVisible>{}</AutoVisible>",
        config.lifecycle.auto_visible
    );
    if !config.lifecycle.start_on_events.is_empty() {
        let _ = writeln!(xml, "          <StartOn>");
        for event in &config.lifecycle.start_on_events {
            let _ = writeln!(xml, "            <Event>{}</Event>", escape(event));
        }
        let _ = writeln!(xml, "          </StartOn>");
    }
    let _ = writeln!(xml, "        </Lifecycle>");
    let _ = writeln!(xml, "        <UI>");
    let _ = writeln!(xml, "          <Type>Panel</Type>");
    let _ = writeln!(xml, "          <Menu>{name}</Menu>");
    let _ = writeln!(xml, "          <Geometry>");
    let _ = writeln!(xml, "            <Size>");
    let _ = writeln!(xml, "              <Width>{}</Width>", config.panel_width);
    let _ = writeln!(xml, "              <Height>{}</Height>", config.panel_height);
    let _ = writeln!(xml, "            </Size>");
    let _ = writeln!(xml, "          </Geometry>");
    let _ = writeln!(xml, "          <Icons>");
    for (slot, path) in config.icons.slots() {
        let _ = writeln!(xml, r#"            <Icon Type="{slot}">{}</Icon>"#, escape(path));
    }
    let _ = writeln!(xml, "          </Icons>");
    let _ = writeln!(xml, "        </UI>");
    let _ = writeln!(xml, "      </DispatchInfo>");
    let _ = writeln!(xml, "    </Extension>");
    let _ = writeln!(xml, "  </DispatchInfoList>");
    xml.push_str("</ExtensionManifest>\n");
    xml
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::hosts::parse_hosts;
    use crate::config::layer::ConfigLayer;

    fn default_config() -> CepConfig {
        ConfigLayer::resolve([])
    }

    #[test]
    fn declares_bundle_identity() {
        let config = default_config();
        let xml = render_manifest(&config, &[]);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"ExtensionBundleId="com.mycompany.myextension""#));
        assert!(xml.contains(r#"ExtensionBundleName="Parcel CEP Extension""#));
        assert!(xml.contains(r#"<Extension Id="com.mycompany.myextension" Version="0.0.1"/>"#));
        assert!(xml.contains(r#"<RequiredRuntime Name="CSXS" Version="6.0"/>"#));
        assert!(xml.trim_end().ends_with("</ExtensionManifest>"));
    }

    #[test]
    fn lists_hosts_with_ranges() {
        let config = default_config();
        let xml = render_manifest(&config, &parse_hosts("PPRO@[12.0,99.9], AEFT"));
        assert!(xml.contains(r#"<Host Name="PPRO" Version="[12.0,99.9]" />"#));
        assert!(xml.contains(r#"<Host Name="AEFT" Version="[0.0,99.9]" />"#));
        assert_eq!(xml.matches("<Host ").count(), 2);
    }

    #[test]
    fn lists_cef_parameters_and_geometry() {
        let config = default_config();
        let xml = render_manifest(&config, &[]);
        assert!(xml.contains("<Parameter>--enable-nodejs</Parameter>"));
        assert!(xml.contains("<Parameter>--mixed-context</Parameter>"));
        assert!(xml.contains("<Width>500</Width>"));
        assert!(xml.contains("<Height>500</Height>"));
        assert!(xml.contains("<Menu>Parcel CEP Extension</Menu>"));
    }

    #[test]
    fn start_on_is_omitted_without_events() {
        let mut config = default_config();
        let xml = render_manifest(&config, &[]);
        assert!(xml.contains("<AutoVisible>true</AutoVisible>"));
        assert!(!xml.contains("<StartOn>"));

        config.lifecycle.auto_visible = false;
        config.lifecycle.start_on_events = vec![
            "com.adobe.csxs.events.ApplicationActivate".to_string(),
            "applicationActivate".to_string(),
        ];
        let xml = render_manifest(&config, &[]);
        assert!(xml.contains("<AutoVisible>false</AutoVisible>"));
        assert!(xml.contains("<StartOn>"));
        assert!(xml.contains("<Event>applicationActivate</Event>"));
        assert_eq!(xml.matches("<Event>").count(), 2);
    }

    #[test]
    fn unset_icon_slots_are_omitted_independently() {
        let mut config = default_config();
        assert_eq!(render_manifest(&config, &[]).matches("<Icon ").count(), 0);

        config.icons.rollover = Some("icons/over.png".to_string());
        let xml = render_manifest(&config, &[]);
        assert_eq!(xml.matches("<Icon ").count(), 1);
        assert!(xml.contains(r#"<Icon Type="RollOver">icons/over.png</Icon>"#));
        assert!(!xml.contains(r#"Type="Normal""#));

        config.icons.normal = Some("icons/normal.png".to_string());
        config.icons.dark_normal = Some("icons/dark.png".to_string());
        config.icons.dark_rollover = Some("icons/dark-over.png".to_string());
        let xml = render_manifest(&config, &[]);
        assert_eq!(xml.matches("<Icon ").count(), 4);
        let normal = xml.find(r#"Type="Normal""#).unwrap();
        let dark_over = xml.find(r#"Type="DarkRollOver""#).unwrap();
        assert!(normal < dark_over);
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let mut config = default_config();
        config.bundle_name = "Cut & Paste".to_string();
        let xml = render_manifest(&config, &[]);
        assert!(xml.contains("<Menu>Cut &amp; Paste</Menu>"));
    }
}
