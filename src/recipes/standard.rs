// src/recipes/standard.rs
//! The standard recipe book: request params, session, cookies, the
//! current exception and host information.

use super::{option_usize, RecipeBook, RecipeOptions};
use crate::constants::{DEFAULT_PARAMS_CUTOFF, ERROR_LINE_SEPARATOR, RECIPE_TABLE_TEMPLATE};
use crate::error::{CallbackError, DebugBarError};
use crate::formatting::{escape_html, pretty_print, InMemoryTemplates};
use crate::model::{BoxOptions, Callback, DebugBox, RenderOutcome};
use crate::types::{BoxId, VariableName};
use serde_json::{json, Value};

impl RecipeBook {
    /// The recipes most web applications want in their debug bar.
    pub fn standard() -> Result<RecipeBook, DebugBarError> {
        let book = RecipeBook::new("standard")
            .with_embedded_templates(InMemoryTemplates::standard_recipes())
            .recipe("params", params_recipe)?
            .recipe("session", session_recipe)?
            .recipe("cookies", cookies_recipe)?
            .recipe("exception", exception_recipe)?
            .recipe("host", host_recipe)?;
        Ok(book)
    }
}

/// Params, pretty-printed. Collapsed when longer than the `cutoff` option.
fn params_recipe(_book: &RecipeBook, options: &RecipeOptions) -> Result<Callback, DebugBarError> {
    let cutoff = option_usize(options, "params", "cutoff", DEFAULT_PARAMS_CUTOFF)?;
    Ok(Callback::new(move |ctx| {
        let params = escape_html(&pretty_print(&ctx.lookup("params")?));
        let hidden = params.len() > cutoff;
        let options = BoxOptions::new().id(BoxId::new("params")?).hidden(hidden);
        Ok(("Params", preformatted(&params), options))
    }))
}

/// The session, always expanded.
fn session_recipe(_book: &RecipeBook, _options: &RecipeOptions) -> Result<Callback, DebugBarError> {
    Ok(Callback::new(|ctx| {
        let session = escape_html(&pretty_print(&ctx.lookup("session")?));
        let options = BoxOptions::new().id(BoxId::new("session")?).hidden(false);
        Ok(("Session", preformatted(&session), options))
    }))
}

/// Cookies as a name/value table. Visibility follows the client preference.
fn cookies_recipe(book: &RecipeBook, _options: &RecipeOptions) -> Result<Callback, DebugBarError> {
    let book = book.clone();
    Ok(Callback::new(move |ctx| {
        let cookies = ctx
            .eval_variable(&VariableName::new("cookies")?)
            .unwrap_or(Value::Null);
        let rows: Vec<Value> = match &cookies {
            Value::Object(jar) => jar
                .iter()
                .map(|(name, value)| json!({"name": name, "value": pretty_print(value)}))
                .collect(),
            _ => Vec::new(),
        };
        let table = book.render_template(RECIPE_TABLE_TEMPLATE, &json!({"rows": rows, "empty": "No cookies"}))?;
        let options = BoxOptions::new().id(BoxId::new("cookies")?);
        Ok(("Cookies", table, options))
    }))
}

/// The exception being handled, if any. Skipped when there is none.
///
/// Accepts either a plain message string or an object with `type`,
/// `message` and `backtrace` (a list of frames).
fn exception_recipe(_book: &RecipeBook, _options: &RecipeOptions) -> Result<Callback, DebugBarError> {
    Ok(Callback::new(|ctx| -> Result<RenderOutcome, CallbackError> {
        let exception = match ctx.eval_variable(&VariableName::new("exception")?) {
            None | Some(Value::Null) => return Ok(RenderOutcome::Skip),
            Some(value) => value,
        };

        let (kind, message, backtrace): (String, String, Vec<String>) = match &exception {
            Value::String(message) => ("Error".to_string(), message.clone(), Vec::new()),
            Value::Object(fields) => (
                fields
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("Error")
                    .to_string(),
                fields
                    .get("message")
                    .map(pretty_print)
                    .unwrap_or_default(),
                fields
                    .get("backtrace")
                    .and_then(Value::as_array)
                    .map(|frames| frames.iter().map(pretty_print).collect())
                    .unwrap_or_default(),
            ),
            other => ("Error".to_string(), pretty_print(other), Vec::new()),
        };

        let lines: Vec<String> = std::iter::once(format!("{}: {}", kind, message))
            .chain(backtrace)
            .map(|line| escape_html(&line))
            .collect();
        let options = BoxOptions::new().id(BoxId::new("exception")?).hidden(false);
        Ok(DebugBox::new("Exception", lines.join(ERROR_LINE_SEPARATOR))
            .with_options(options)
            .into())
    }))
}

/// Facts about the process rendering the page.
fn host_recipe(book: &RecipeBook, _options: &RecipeOptions) -> Result<Callback, DebugBarError> {
    let book = book.clone();
    Ok(Callback::new(move |_ctx| {
        let hostname = std::env::var("HOSTNAME")
            .or_else(|_| std::env::var("COMPUTERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let working_dir = std::env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|e| format!("unavailable ({})", e));

        let rows = json!([
            {"name": "Host", "value": hostname},
            {"name": "Platform", "value": format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)},
            {"name": "Process", "value": std::process::id().to_string()},
            {"name": "Working directory", "value": working_dir},
            {"name": "Rendered at", "value": chrono::Local::now().to_rfc3339()},
            {"name": "debug-bar", "value": env!("CARGO_PKG_VERSION")},
        ]);
        let table = book.render_template(RECIPE_TABLE_TEMPLATE, &json!({"rows": rows, "empty": ""}))?;
        Ok(("Host", table, BoxOptions::new().id(BoxId::new("host")?)))
    }))
}

fn preformatted(text: &str) -> String {
    format!("<pre>{}</pre>", text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use serde_json::json;

    fn build(name: &str, options: RecipeOptions) -> Callback {
        RecipeBook::standard().unwrap().build(name, &options).unwrap()
    }

    fn debug_box(callback: &Callback, ctx: &RequestContext) -> DebugBox {
        match callback.call(ctx).unwrap() {
            RenderOutcome::Box(b) => b,
            RenderOutcome::Skip => panic!("expected a box"),
        }
    }

    fn companions() -> RequestContext {
        RequestContext::new().variable(
            "params",
            json!({"given_name": "Amelia", "family_name": "Pond"}),
        )
    }

    #[test]
    fn test_standard_book_recipes() {
        let names: Vec<String> = RecipeBook::standard()
            .unwrap()
            .recipes()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["params", "session", "cookies", "exception", "host"]);
    }

    #[test]
    fn test_params_short_enough_is_shown() {
        let b = debug_box(&build("params", RecipeOptions::new()), &companions());
        assert_eq!(b.title, "Params");
        assert!(b.content.contains("Amelia"));
        assert!(b.content.contains("given_name"));
        assert_eq!(b.options.hidden, Some(false));
        assert_eq!(b.options.id.as_ref().map(BoxId::as_str), Some("params"));
    }

    #[test]
    fn test_params_over_cutoff_is_hidden() {
        let mut options = RecipeOptions::new();
        options.insert("cutoff".to_string(), json!(12));
        let b = debug_box(&build("params", options), &companions());
        assert_eq!(b.options.hidden, Some(true));
    }

    #[test]
    fn test_params_escapes_markup() {
        let ctx = RequestContext::new().variable("params", json!({"q": "<b>"}));
        let b = debug_box(&build("params", RecipeOptions::new()), &ctx);
        assert!(b.content.contains("&lt;b&gt;"));
        assert!(!b.content.contains("<b>"));
    }

    #[test]
    fn test_params_missing_is_an_error() {
        let callback = build("params", RecipeOptions::new());
        assert!(callback.call(&RequestContext::new()).is_err());
    }

    #[test]
    fn test_bad_cutoff_fails_at_build_time() {
        let mut options = RecipeOptions::new();
        options.insert("cutoff".to_string(), json!(-1));
        assert!(RecipeBook::standard()
            .unwrap()
            .build("params", &options)
            .is_err());
    }

    #[test]
    fn test_session_is_always_open() {
        let ctx = RequestContext::new().variable("session", json!({"user_id": 11}));
        let b = debug_box(&build("session", RecipeOptions::new()), &ctx);
        assert_eq!(b.title, "Session");
        assert_eq!(b.options.hidden, Some(false));
        assert!(b.content.contains("user_id"));
    }

    #[test]
    fn test_cookies_table() {
        let ctx = RequestContext::new()
            .cookie("debug_bar", "params")
            .cookie("flavour", "<oatmeal>");
        let b = debug_box(&build("cookies", RecipeOptions::new()), &ctx);
        assert_eq!(b.title, "Cookies");
        assert!(b.content.contains("flavour"));
        assert!(b.content.contains("&lt;oatmeal&gt;"));
        assert_eq!(b.options.hidden, None);
    }

    #[test]
    fn test_table_template_is_embedded_and_overridable() {
        let ctx = RequestContext::new().cookie("theme", "dark");
        let book = RecipeBook::standard().unwrap();
        assert!(book.template_search_path().paths().is_empty());
        let b = debug_box(&book.build("cookies", &RecipeOptions::new()).unwrap(), &ctx);
        assert!(b.content.contains("dbar-table"));

        let dir = std::env::temp_dir().join(format!("debug_bar_table_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("table.html.hbs"), "<ol>{{#each rows}}<li>{{this.name}}</li>{{/each}}</ol>").unwrap();
        let book = RecipeBook::standard().unwrap().with_template_search_paths([&dir]);
        let b = debug_box(&book.build("cookies", &RecipeOptions::new()).unwrap(), &ctx);
        assert_eq!(b.content, "<ol><li>theme</li></ol>");
    }

    #[test]
    fn test_cookies_empty() {
        let b = debug_box(&build("cookies", RecipeOptions::new()), &RequestContext::new());
        assert!(b.content.contains("No cookies"));
    }

    #[test]
    fn test_exception_skipped_without_exception() {
        let callback = build("exception", RecipeOptions::new());
        assert!(callback.call(&RequestContext::new()).unwrap().is_skip());

        let ctx = RequestContext::new().variable("exception", Value::Null);
        assert!(callback.call(&ctx).unwrap().is_skip());
    }

    #[test]
    fn test_exception_with_backtrace() {
        let ctx = RequestContext::new().variable(
            "exception",
            json!({
                "type": "RuntimeError",
                "message": "Uh-oh <here>",
                "backtrace": ["app.rs:10", "main.rs:3"]
            }),
        );
        let b = debug_box(&build("exception", RecipeOptions::new()), &ctx);
        assert_eq!(b.title, "Exception");
        assert_eq!(
            b.content,
            "RuntimeError: Uh-oh &lt;here&gt;<br/>app.rs:10<br/>main.rs:3"
        );
        assert_eq!(b.options.hidden, Some(false));
    }

    #[test]
    fn test_host_reports_process() {
        let b = debug_box(&build("host", RecipeOptions::new()), &RequestContext::new());
        assert_eq!(b.title, "Host");
        assert!(b.content.contains(&std::process::id().to_string()));
        assert!(b.content.contains(std::env::consts::OS));
    }
}
