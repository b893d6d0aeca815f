// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::{PREFERENCE_SEPARATOR, TEMPLATE_EXTENSION};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shape shared by recipe and variable names.
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[_a-zA-Z][_a-zA-Z0-9]*$")
        .expect("Failed to compile identifier regex - this is a bug in the code")
});

/// Name under which a recipe is registered in a recipe book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipeName(String);

impl RecipeName {
    /// Create a new recipe name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ValidationError::InvalidRecipeName {
                name,
                reason: "Recipe name cannot be empty".to_string(),
            });
        }

        if !IDENTIFIER.is_match(&name) {
            return Err(ValidationError::InvalidRecipeName {
                name,
                reason: "Recipe names must be identifiers (letters, digits, underscores)"
                    .to_string(),
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for RecipeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecipeName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RecipeName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecipeName> for String {
    fn from(name: RecipeName) -> Self {
        name.0
    }
}

/// Name of a variable a callback may read from the render context.
///
/// Only plain identifiers are accepted, so a lookup can never be
/// mistaken for an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableName(String);

impl VariableName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if !IDENTIFIER.is_match(&name) {
            return Err(ValidationError::InvalidVariableName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// DOM id of a box, also the token stored in the preference cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(String);

impl BoxId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ValidationError::InvalidBoxId {
                id,
                reason: "Box id cannot be empty".to_string(),
            });
        }

        // The id round-trips unencoded through the preference cookie and a DOM attribute.
        if id.contains(PREFERENCE_SEPARATOR)
            || id.chars().any(|c| c.is_whitespace() || matches!(c, ';' | '=' | '%' | '"'))
        {
            return Err(ValidationError::InvalidBoxId {
                id,
                reason: "Box id cannot contain commas, whitespace, ';', '=', '%' or quotes".to_string(),
            });
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Template name with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateName(String);

impl TemplateName {
    /// Create a new template name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::InvalidTemplateName {
                name: name.clone(),
                reason: "Template name cannot be empty".to_string(),
            });
        }

        // Symbolic names only; the extension is appended at lookup time.
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidTemplateName {
                name: name.clone(),
                reason: "Template name can only contain alphanumeric characters, hyphens and underscores".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Names of templates shipped with the crate, which are valid by construction.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::new(name).is_ok(), "invalid built-in template name {name:?}");
        Self(name.to_string())
    }

    /// Get the template name as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name searched for in template directories, e.g. `layout.html.hbs`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, TEMPLATE_EXTENSION)
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The complete debug bar markup produced by a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBar {
    html: String,
    box_count: usize,
}

impl RenderedBar {
    pub fn new(html: String, box_count: usize) -> Self {
        Self { html, box_count }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    /// Boxes in the bar, error boxes included. Skipped callbacks are not counted.
    pub fn box_count(&self) -> usize {
        self.box_count
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

impl fmt::Display for RenderedBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_name_validation() {
        assert!(RecipeName::new("params").is_ok());
        assert!(RecipeName::new("_private_recipe2").is_ok());
        assert!(RecipeName::new("").is_err());
        assert!(RecipeName::new("   ").is_err());
        assert!(RecipeName::new("2fast").is_err());
        assert!(RecipeName::new("with space").is_err());
    }

    #[test]
    fn test_variable_name_rejects_expressions() {
        assert!(VariableName::new("params").is_ok());
        assert!(VariableName::new("1+1").is_err());
        assert!(VariableName::new("params.class").is_err());
        assert!(VariableName::new("def foo").is_err());
    }

    #[test]
    fn test_box_id_validation() {
        assert!(BoxId::new("rory_williams").is_ok());
        assert!(BoxId::new("").is_err());
        assert!(BoxId::new("a,b").is_err());
        assert!(BoxId::new("a b").is_err());
        assert!(BoxId::new("a;b").is_err());
        assert!(BoxId::new("a=b").is_err());
        assert!(BoxId::new("a%2Cb").is_err());
    }

    #[test]
    fn test_builtin_template_names_are_valid() {
        for name in [
            crate::constants::LAYOUT_TEMPLATE,
            crate::constants::CALLBACK_BOX_TEMPLATE,
            crate::constants::RECIPE_TABLE_TEMPLATE,
        ] {
            assert_eq!(TemplateName::from_static(name), TemplateName::new(name).unwrap());
        }
    }

    #[test]
    fn test_template_name_validation() {
        assert!(TemplateName::new("layout").is_ok());
        assert!(TemplateName::new("callback_box").is_ok());
        assert!(TemplateName::new("").is_err());
        assert!(TemplateName::new("../etc/passwd").is_err());
        assert_eq!(
            TemplateName::new("layout").unwrap().file_name(),
            "layout.html.hbs"
        );
    }

    #[test]
    fn test_recipe_name_deserializes_with_validation() {
        let ok: RecipeName = serde_json::from_str("\"session\"").unwrap();
        assert_eq!(ok.as_str(), "session");
        assert!(serde_json::from_str::<RecipeName>("\"not valid\"").is_err());
    }
}
