//! `.debug` descriptor renderer.
//!
//! The descriptor enables remote debugging of an unsigned extension. It always
//! lists the twelve known hosts with ports 3001..=3012 in canonical order; the
//! configured host list and `debugPorts` do not affect it.
use std::fmt::Write as _;

use super::escape;
use crate::config::hosts::KNOWN_HOSTS;

/// Port of the first host slot; slot `i` listens on `BASE_PORT + i + 1`.
pub const BASE_PORT: u16 = 3000;

/// Render the debug descriptor for `bundle_id`.
#[must_use]
pub fn render_debug(bundle_id: &str) -> String {
    let mut xml = String::new();
    let _ = writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(xml, "<ExtensionList>");
    let _ = writeln!(xml, r#"  <Extension Id="{}">"#, escape(bundle_id));
    let _ = writeln!(xml, "    <HostList>");
    for (port, name) in (BASE_PORT + 1..).zip(KNOWN_HOSTS) {
        let _ = writeln!(xml, r#"      <Host Name="{name}" Port="{port}" />"#);
    }
    let _ = writeln!(xml, "    </HostList>");
    let _ = writeln!(xml, "  </Extension>");
    xml.push_str("</ExtensionList>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_twelve_slots_in_order() {
        let xml = render_debug("com.example.panel");
        assert_eq!(xml.matches("<Host ").count(), 12);
        assert!(xml.contains(r#"<Host Name="PHXS" Port="3001" />"#));
        assert!(xml.contains(r#"<Host Name="KBRG" Port="3012" />"#));
        let ports: Vec<&str> = xml
            .lines()
            .filter_map(|l| l.split("Port=\"").nth(1))
            .filter_map(|rest| rest.split('"').next())
            .collect();
        let expected: Vec<String> = (3001..=3012).map(|p: u16| p.to_string()).collect();
        assert_eq!(ports, expected);
    }

    #[test]
    fn full_descriptor() {
        insta::assert_snapshot!(render_debug("com.example.panel"), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <ExtensionList>
          <Extension Id="com.example.panel">
            <HostList>
              <Host Name="PHXS" Port="3001" />
              <Host Name="IDSN" Port="3002" />
              <Host Name="AICY" Port="3003" />
              <Host Name="ILST" Port="3004" />
              <Host Name="PPRO" Port="3005" />
              <Host Name="PRLD" Port="3006" />
              <Host Name="AEFT" Port="3007" />
              <Host Name="FLPR" Port="3008" />
              <Host Name="AUDT" Port="3009" />
              <Host Name="DRWV" Port="3010" />
              <Host Name="MUST" Port="3011" />
              <Host Name="KBRG" Port="3012" />
            </HostList>
          </Extension>
        </ExtensionList>
        "#);
    }
}
