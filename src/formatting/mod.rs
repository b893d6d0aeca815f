// src/formatting/mod.rs
//! Turns callback results into debug bar markup.

// Sub-modules
pub mod renderer;
pub mod templates;

pub use self::renderer::{render_bar, render_callback_box};
pub use self::templates::{InMemoryTemplates, TemplateSearchPath, TemplateSource};

use serde_json::Value;

/// Escapes text for inclusion in HTML, using the template engine's rules.
pub fn escape_html(text: &str) -> String {
    handlebars::html_escape(text)
}

/// Pretty-prints an arbitrary value for display inside a `<pre>` block.
///
/// The result is plain text; escape it before embedding it in markup.
pub fn pretty_print(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Inserts the rendered bar into a page, just before its closing body tag.
///
/// Pages without a `</body>` get the bar appended.
pub fn inject_into_page(page: &str, bar: &str) -> String {
    match page.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &page[..pos], bar, &page[pos..]),
        None => format!("{}{}", page, bar),
    }
}
