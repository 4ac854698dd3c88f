//! `panel.html` renderer: a page that immediately redirects the CEP browser.
use super::escape;

/// Render a redirect page titled `title` that sends the browser to `href`.
#[must_use]
pub fn render_panel(title: &str, href: &str) -> String {
    // A JSON string is a valid JavaScript string literal.
    let target = serde_json::to_string(href).unwrap_or_else(|_| String::from("\"\""));
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>{}</title>
  </head>
  <body>
    <script>
      window.location.href = {};
    </script>
  </body>
</html>
"#,
        escape(title),
        target.replace("</", "<\\/")
    )
}
