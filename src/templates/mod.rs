//! Text renderers for the files a CEP extension needs at its root.
//!
//! All renderers are pure: the same inputs always produce the same text.
pub mod debug;
pub mod manifest;
pub mod panel;

pub use debug::render_debug;
pub use manifest::render_manifest;
pub use panel::render_panel;

/// Escape text for use in XML/HTML content and double-quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
