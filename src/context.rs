// src/context.rs
//! The environment a debug bar is rendered in.
//!
//! Callbacks see the caller's environment only through [`RenderContext`],
//! which offers exactly two capabilities: reading a named variable and
//! reading the client's preference list. [`RequestContext`] is a
//! JSON-backed implementation suitable for hosts and tests.

use crate::constants::{PREFERENCE_COOKIE, PREFERENCE_SEPARATOR};
use crate::error::DebugBarError;
use crate::types::VariableName;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::path::Path;

/// Capabilities a render needs from the host.
pub trait RenderContext {
    /// Value of the named variable, if the host defines it.
    fn eval_variable(&self, name: &VariableName) -> Option<Value>;

    /// Ids of the boxes the client previously kept open.
    fn preference_list(&self) -> Vec<String>;

    /// Validates `name` and looks it up, failing when it is undefined.
    fn lookup(&self, name: &str) -> Result<Value, DebugBarError> {
        let variable = VariableName::new(name)?;
        self.eval_variable(&variable)
            .ok_or_else(|| DebugBarError::VariableNotFound {
                name: variable.to_string(),
            })
    }
}

/// Splits a raw preference cookie value into box ids.
///
/// Hosts may hand over the cookie still percent-encoded (`params%2Csession`),
/// so the value is decoded before splitting.
pub fn parse_preference_list(raw: &str) -> Vec<String> {
    percent_decode_str(raw)
        .decode_utf8_lossy()
        .split(PREFERENCE_SEPARATOR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// A render context backed by a JSON object of variables.
///
/// Cookies live in the `cookies` variable as an object of strings; the
/// preference list is read from one of them (`debug_bar` by default).
#[derive(Debug, Clone)]
pub struct RequestContext {
    variables: Map<String, Value>,
    preference_cookie: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            variables: Map::new(),
            preference_cookie: PREFERENCE_COOKIE.to_string(),
        }
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from a JSON object whose keys are variable names.
    pub fn from_json(value: Value) -> Result<Self, DebugBarError> {
        match value {
            Value::Object(variables) => {
                for name in variables.keys() {
                    VariableName::new(name.as_str())?;
                }
                Ok(Self {
                    variables,
                    ..Self::default()
                })
            }
            other => Err(DebugBarError::InvalidContext {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Reads a context from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DebugBarError> {
        let raw = std::fs::read_to_string(path)?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|source| DebugBarError::ContextParse {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded render context from {}", path.display());
        Self::from_json(value)
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let cookies = self
            .variables
            .entry("cookies")
            .or_insert_with(|| Value::Object(Map::new()));
        if !cookies.is_object() {
            *cookies = Value::Object(Map::new());
        }
        if let Value::Object(jar) = cookies {
            jar.insert(name.into(), Value::String(value.into()));
        }
        self
    }

    /// Changes which cookie holds the preference list.
    pub fn preference_cookie(mut self, name: impl Into<String>) -> Self {
        self.preference_cookie = name.into();
        self
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}

impl RenderContext for RequestContext {
    fn eval_variable(&self, name: &VariableName) -> Option<Value> {
        self.variables.get(name.as_str()).cloned()
    }

    fn preference_list(&self) -> Vec<String> {
        self.variables
            .get("cookies")
            .and_then(|cookies| cookies.get(&self.preference_cookie))
            .and_then(Value::as_str)
            .map(parse_preference_list)
            .unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_reads_variables() {
        let ctx = RequestContext::new().variable("amelia_pond", "amelia_pond");
        assert_eq!(ctx.lookup("amelia_pond").unwrap(), json!("amelia_pond"));
    }

    #[test]
    fn test_lookup_missing_variable() {
        let ctx = RequestContext::new();
        let err = ctx.lookup("river_song").unwrap_err();
        assert!(matches!(err, DebugBarError::VariableNotFound { ref name } if name == "river_song"));
    }

    #[test]
    fn test_lookup_refuses_expressions() {
        let ctx = RequestContext::new().variable("amelia_pond", 1);
        for expr in ["1+1", "amelia_pond.class", "def foo"] {
            assert!(matches!(
                ctx.lookup(expr),
                Err(DebugBarError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_preference_list_from_cookie() {
        let ctx = RequestContext::new().cookie("debug_bar", "rory_williams,amelia_pond");
        assert_eq!(ctx.preference_list(), vec!["rory_williams", "amelia_pond"]);
    }

    #[test]
    fn test_preference_list_absent_is_empty() {
        assert!(RequestContext::new().preference_list().is_empty());
        let ctx = RequestContext::new().cookie("session_id", "abc");
        assert!(ctx.preference_list().is_empty());
    }

    #[test]
    fn test_custom_preference_cookie() {
        let ctx = RequestContext::new()
            .cookie("toolbar_open", "params")
            .preference_cookie("toolbar_open");
        assert_eq!(ctx.preference_list(), vec!["params"]);
    }

    #[test]
    fn test_parse_preference_list_drops_blanks() {
        assert_eq!(parse_preference_list(" a,,b ,"), vec!["a", "b"]);
        assert!(parse_preference_list("").is_empty());
    }

    #[test]
    fn test_percent_encoded_cookie_is_decoded() {
        let ctx = RequestContext::new().cookie("debug_bar", "params%2Csession");
        assert_eq!(ctx.preference_list(), vec!["params", "session"]);
        assert_eq!(parse_preference_list("rory%2c%20amelia"), vec!["rory", "amelia"]);
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(RequestContext::from_json(json!({"params": {"id": 1}})).is_ok());
        assert!(matches!(
            RequestContext::from_json(json!([1, 2])),
            Err(DebugBarError::InvalidContext { .. })
        ));
        assert!(RequestContext::from_json(json!({"not valid": 1})).is_err());
    }
}
