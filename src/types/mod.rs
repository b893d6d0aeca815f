use thiserror::Error;

mod domain_types;

pub use domain_types::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid recipe name: {name:?} - {reason}")]
    InvalidRecipeName { name: String, reason: String },

    #[error("{0:?} is not a valid variable name")]
    InvalidVariableName(String),

    #[error("Invalid box id: {id:?} - {reason}")]
    InvalidBoxId { id: String, reason: String },

    #[error("Invalid template name: {name} - {reason}")]
    InvalidTemplateName { name: String, reason: String },

    #[error("Invalid file path: {path} - {reason}")]
    InvalidFilePath { path: String, reason: String },
}
