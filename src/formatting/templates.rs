// src/formatting/templates.rs
//! Locating and rendering Handlebars templates by symbolic name.
//!
//! The crate's own templates are compiled into the binary. Directories on a
//! [`TemplateSearchPath`] override them file by file.

use crate::constants::{CALLBACK_BOX_TEMPLATE, LAYOUT_TEMPLATE, RECIPE_TABLE_TEMPLATE};
use crate::error::DebugBarError;
use crate::types::TemplateName;
use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

const LAYOUT_BODY: &str = include_str!("../../templates/layout.html.hbs");
const CALLBACK_BOX_BODY: &str = include_str!("../../templates/callback_box.html.hbs");
const RECIPE_TABLE_BODY: &str = include_str!("../../templates/recipes/table.html.hbs");

/// Something that can hand back the raw text of a named template.
pub trait TemplateSource: Send + Sync {
    fn read_template(&self, name: &TemplateName) -> Result<String, DebugBarError>;
}

/// Ordered list of directories searched for `<name>.html.hbs`.
///
/// The first directory holding a matching file wins. Names no directory
/// provides come from the embedded fallback, if one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSearchPath {
    paths: Vec<PathBuf>,
    fallback: Option<InMemoryTemplates>,
}

impl TemplateSearchPath {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            fallback: None,
        }
    }

    /// No directories, falling back to the bar's embedded `layout` and `callback_box`.
    pub fn builtin() -> Self {
        Self::default().with_fallback(InMemoryTemplates::builtin())
    }

    pub fn with_fallback(mut self, fallback: InMemoryTemplates) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Replaces the directories, keeping the fallback.
    pub fn set_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
    }

    /// Puts `path` ahead of every existing entry.
    pub fn prepend(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(0, path.into());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// First existing file for `name` along the search path.
    pub fn locate(&self, name: &TemplateName) -> Option<PathBuf> {
        let file_name = name.file_name();
        self.paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }
}

impl TemplateSource for TemplateSearchPath {
    fn read_template(&self, name: &TemplateName) -> Result<String, DebugBarError> {
        if let Some(path) = self.locate(name) {
            log::debug!("Reading template {} from {}", name, path.display());
            return Ok(std::fs::read_to_string(path)?);
        }
        if let Some(body) = self.fallback.as_ref().and_then(|f| f.get(name)) {
            log::debug!("Using embedded template {}", name);
            return Ok(body.to_string());
        }
        Err(DebugBarError::TemplateNotFound {
            name: name.file_name(),
            searched: self.paths.clone(),
        })
    }
}

/// Templates held in memory, keyed by symbolic name.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct InMemoryTemplates {
    templates: IndexMap<TemplateName, String>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bar's own `layout` and `callback_box`.
    pub fn builtin() -> Self {
        Self::new()
            .with(TemplateName::from_static(LAYOUT_TEMPLATE), LAYOUT_BODY)
            .with(TemplateName::from_static(CALLBACK_BOX_TEMPLATE), CALLBACK_BOX_BODY)
    }

    /// Sub-templates used by the standard recipe book.
    pub fn standard_recipes() -> Self {
        Self::new().with(TemplateName::from_static(RECIPE_TABLE_TEMPLATE), RECIPE_TABLE_BODY)
    }

    pub fn with(mut self, name: TemplateName, body: impl Into<String>) -> Self {
        self.templates.insert(name, body.into());
        self
    }

    pub fn get(&self, name: &TemplateName) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }
}

impl fmt::Debug for InMemoryTemplates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.templates.keys()).finish()
    }
}

impl TemplateSource for InMemoryTemplates {
    fn read_template(&self, name: &TemplateName) -> Result<String, DebugBarError> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| DebugBarError::TemplateNotFound {
                name: name.file_name(),
                searched: Vec::new(),
            })
    }
}

/// A Handlebars registry loaded with a fixed set of named templates.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Reads and compiles every template in `names` from `source`.
    pub fn load(source: &dyn TemplateSource, names: &[&TemplateName]) -> Result<Self, DebugBarError> {
        let mut handlebars = Handlebars::new();
        for name in names {
            let body = source.read_template(name)?;
            handlebars
                .register_template_string(name.as_str(), body)
                .map_err(|e| DebugBarError::TemplateRender {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(Self { handlebars })
    }

    pub fn render<T: Serialize>(&self, name: &TemplateName, data: &T) -> Result<String, DebugBarError> {
        self.handlebars
            .render(name.as_str(), data)
            .map_err(|e| DebugBarError::TemplateRender {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}

/// Loads a single template and renders it with `data`.
pub fn render_template<T: Serialize>(
    source: &dyn TemplateSource,
    name: &TemplateName,
    data: &T,
) -> Result<String, DebugBarError> {
    TemplateEngine::load(source, &[name])?.render(name, data)
}
