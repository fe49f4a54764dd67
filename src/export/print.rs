//! Print-preview page: a self-printing HTML document.

use super::types::FooterFields;
use base64::{Engine as _, engine::general_purpose};

/// Builds a complete HTML page showing the form name, the footer fields,
/// and the flattened PNG, which opens the print dialog when loaded.
pub fn render_print_html(form_name: &str, footer: &FooterFields, png: &[u8]) -> String {
    let data_uri = format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    );
    let form = escape_html(form_name);
    let name = escape_html(&footer.name);
    let identifier = escape_html(&footer.identifier);
    let date = escape_html(&footer.date);

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{form} - {name}</title>
    <style>
      body {{ margin: 0; padding: 20px; }}
      img {{ max-width: 100%; height: auto; }}
      .info {{ margin-bottom: 20px; font-family: Arial, sans-serif; }}
    </style>
  </head>
  <body>
    <div class="info">
      <h2>{form}</h2>
      <p><strong>Patient:</strong> {name}</p>
      <p><strong>MR No:</strong> {identifier}</p>
      <p><strong>Date:</strong> {date}</p>
    </div>
    <img src="{data_uri}" alt="{form}">
    <script>window.print();</script>
  </body>
</html>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
