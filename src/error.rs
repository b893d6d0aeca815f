// src/error.rs
//! Error types for configuring and rendering a debug bar.
//!
//! Two families live here. `DebugBarError` covers configuration-time and
//! template failures; these are programmer errors and propagate to the
//! caller. `CallbackError` is what a diagnostic callback returns when it
//! cannot produce its box; the renderer turns it into a visible error box
//! and never lets it escape `render`.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main library error type.
#[derive(Error, Debug)]
pub enum DebugBarError {
    #[error("Could not find recipe {name:?}")]
    RecipeNotFound { name: String },

    #[error("Invalid options for recipe {recipe:?}: {reason}")]
    InvalidRecipeOptions { recipe: String, reason: String },

    #[error("Invalid callback: {reason}")]
    InvalidCallback { reason: String },

    #[error("Unknown template {name:?}. Not in {}", format_search_paths(searched))]
    TemplateNotFound { name: String, searched: Vec<PathBuf> },

    #[error("Template render error for template {name}: {message}")]
    TemplateRender { name: String, message: String },

    #[error("Variable {name:?} is not defined in the render context")]
    VariableNotFound { name: String },

    #[error("Invalid render context: {reason}")]
    InvalidContext { reason: String },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error for {path}: {source}")]
    ContextParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },
}

fn format_search_paths(paths: &[PathBuf]) -> String {
    let listed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", listed.join(", "))
}

/// Result type alias for convenience
pub type Result<T, E = DebugBarError> = std::result::Result<T, E>;

/// Failure raised while a callback produces its box.
///
/// Any `std::error::Error` converts into it with `?`, recording the
/// concrete type name and a backtrace. Backtraces are always captured,
/// whatever `RUST_BACKTRACE` says, since the error box is the only place a
/// developer sees them. Panics caught by the renderer are converted with
/// [`CallbackError::from_panic`].
pub struct CallbackError {
    type_name: String,
    message: String,
    backtrace: Backtrace,
}

impl CallbackError {
    /// An ad hoc failure with a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            type_name: "CallbackError".to_string(),
            message: message.into(),
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Converts a panic payload caught at the render boundary.
    ///
    /// `backtrace` should be taken where the panic was raised; the catch
    /// site no longer has the callback's frames on the stack.
    pub fn from_panic(payload: Box<dyn Any + Send>, backtrace: Backtrace) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "callback panicked with a non-string payload".to_string()
        };

        Self {
            type_name: "panic".to_string(),
            message,
            backtrace,
        }
    }

    /// Fully qualified type name of the underlying error.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Backtrace frames, one per line; empty on platforms without unwinding support.
    pub fn backtrace_lines(&self) -> Vec<String> {
        match self.backtrace.status() {
            BacktraceStatus::Captured => self
                .backtrace
                .to_string()
                .lines()
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl<E> From<E> for CallbackError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            type_name: std::any::type_name::<E>().to_string(),
            message,
            backtrace: Backtrace::force_capture(),
        }
    }
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

impl fmt::Debug for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackError")
            .field("type_name", &self.type_name)
            .field("message", &self.message)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_lists_search_paths() {
        let err = DebugBarError::TemplateNotFound {
            name: "layout.html.hbs".to_string(),
            searched: vec![PathBuf::from("/a"), PathBuf::from("/b")],
        };
        assert_eq!(
            err.to_string(),
            "Unknown template \"layout.html.hbs\". Not in [/a, /b]"
        );
    }

    #[test]
    fn test_callback_error_records_type_name() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = CallbackError::from(io);
        assert!(err.type_name().starts_with("std::io::"));
        assert_eq!(err.message(), "disk on fire");
    }

    #[test]
    fn test_callback_error_from_debug_bar_error() {
        fn lookup() -> std::result::Result<(), CallbackError> {
            Err::<(), _>(DebugBarError::VariableNotFound {
                name: "params".to_string(),
            })?;
            Ok(())
        }

        let err = lookup().unwrap_err();
        assert!(err.type_name().ends_with("DebugBarError"));
        assert!(err.to_string().contains("\"params\" is not defined"));
    }

    #[test]
    fn test_callback_error_from_panic_payloads() {
        let err = CallbackError::from_panic(Box::new("boom"), Backtrace::disabled());
        assert_eq!(err.type_name(), "panic");
        assert_eq!(err.message(), "boom");
        assert!(err.backtrace_lines().is_empty());

        let err = CallbackError::from_panic(Box::new(String::from("owned boom")), Backtrace::disabled());
        assert_eq!(err.message(), "owned boom");

        let err = CallbackError::from_panic(Box::new(42_u8), Backtrace::disabled());
        assert!(err.message().contains("non-string"));
    }

    #[test]
    fn test_backtrace_captured_without_env() {
        let err = CallbackError::msg("boom");
        assert!(!err.backtrace_lines().is_empty());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        assert!(!CallbackError::from(io).backtrace_lines().is_empty());
    }
}
