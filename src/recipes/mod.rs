// src/recipes/mod.rs
//! Recipe books: named registries of callback factories.
//!
//! A recipe is a factory that, given an options mapping, builds a fresh
//! [`Callback`]. Building is lazy and cheap; nothing runs until the debug
//! bar renders. Books are explicit tables, so listing the recipes a book
//! knows is just listing its keys.

mod standard;

use crate::error::DebugBarError;
use crate::formatting::templates::{render_template, InMemoryTemplates, TemplateSearchPath};
use crate::model::Callback;
use crate::types::{RecipeName, TemplateName, ValidationError};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Options passed to a recipe factory, e.g. `{"cutoff": 12}`.
pub type RecipeOptions = Map<String, Value>;

type FactoryFn =
    dyn Fn(&RecipeBook, &RecipeOptions) -> Result<Callback, DebugBarError> + Send + Sync;

/// A named table of recipe factories.
#[derive(Clone)]
pub struct RecipeBook {
    name: String,
    recipes: IndexMap<RecipeName, Arc<FactoryFn>>,
    template_search_path: TemplateSearchPath,
}

impl RecipeBook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recipes: IndexMap::new(),
            template_search_path: TemplateSearchPath::default(),
        }
    }

    /// Registers `factory` under `name`, replacing any earlier registration.
    ///
    /// The factory receives the book itself (for sub-templates) and the
    /// options given at build time; it must accept an empty mapping.
    pub fn recipe<F>(mut self, name: &str, factory: F) -> Result<Self, ValidationError>
    where
        F: Fn(&RecipeBook, &RecipeOptions) -> Result<Callback, DebugBarError>
            + Send
            + Sync
            + 'static,
    {
        let name = RecipeName::new(name)?;
        self.recipes.insert(name, Arc::new(factory));
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of every registered recipe, in registration order.
    pub fn recipes(&self) -> Vec<RecipeName> {
        self.recipes.keys().cloned().collect()
    }

    pub fn includes(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// Builds a fresh callback from the named recipe.
    pub fn build(&self, name: &str, options: &RecipeOptions) -> Result<Callback, DebugBarError> {
        let factory = self
            .recipes
            .get(name)
            .ok_or_else(|| DebugBarError::RecipeNotFound {
                name: name.to_string(),
            })?;
        log::debug!("Building recipe {:?} from book {:?}", name, self.name);
        factory(self, options)
    }

    pub fn template_search_path(&self) -> &TemplateSearchPath {
        &self.template_search_path
    }

    pub fn set_template_search_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.template_search_path.set_paths(paths);
    }

    pub fn with_template_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.set_template_search_paths(paths);
        self
    }

    /// Templates used when no search directory provides them.
    pub fn with_embedded_templates(mut self, templates: InMemoryTemplates) -> Self {
        self.template_search_path = self.template_search_path.with_fallback(templates);
        self
    }

    /// Renders one of the book's sub-templates with `locals`.
    pub fn render_template<T: Serialize>(&self, name: &str, locals: &T) -> Result<String, DebugBarError> {
        let name = TemplateName::new(name)?;
        render_template(&self.template_search_path, &name, locals)
    }
}

impl fmt::Debug for RecipeBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeBook")
            .field("name", &self.name)
            .field("recipes", &self.recipes.keys().collect::<Vec<_>>())
            .field("template_search_path", &self.template_search_path)
            .finish()
    }
}

/// A recipe book to attach: a constructor to call, or a book already built.
#[derive(Debug, Clone)]
pub enum BookSource {
    Constructor(fn() -> Result<RecipeBook, DebugBarError>),
    Instance(Arc<RecipeBook>),
}

impl BookSource {
    /// Normalizes the source to a shared instance.
    pub fn into_book(self) -> Result<Arc<RecipeBook>, DebugBarError> {
        match self {
            BookSource::Constructor(construct) => Ok(Arc::new(construct()?)),
            BookSource::Instance(book) => Ok(book),
        }
    }
}

impl From<RecipeBook> for BookSource {
    fn from(book: RecipeBook) -> Self {
        BookSource::Instance(Arc::new(book))
    }
}

impl From<Arc<RecipeBook>> for BookSource {
    fn from(book: Arc<RecipeBook>) -> Self {
        BookSource::Instance(book)
    }
}

impl From<fn() -> Result<RecipeBook, DebugBarError>> for BookSource {
    fn from(construct: fn() -> Result<RecipeBook, DebugBarError>) -> Self {
        BookSource::Constructor(construct)
    }
}

/// Reads a non-negative integer option, falling back to `default`.
pub fn option_usize(
    options: &RecipeOptions,
    recipe: &str,
    key: &str,
    default: usize,
) -> Result<usize, DebugBarError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| DebugBarError::InvalidRecipeOptions {
                recipe: recipe.to_string(),
                reason: format!("{} must be a non-negative integer, got {}", key, value),
            }),
    }
}
