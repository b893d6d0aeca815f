// src/bar.rs
//! The debug bar: an ordered set of recipe books and callbacks.
//!
//! A bar is configured once (books attached, callbacks added) and then
//! rendered, possibly many times. Books and callbacks are append-only.
//! Recipe lookups scan books newest first, so a book added later shadows
//! same-named recipes of earlier books.

use crate::constants::DEFAULT_SLOW_CALLBACK_MS;
use crate::context::RenderContext;
use crate::error::{CallbackError, DebugBarError};
use crate::formatting::render_bar;
use crate::formatting::templates::{TemplateSearchPath, TemplateSource};
use crate::model::{Callback, RenderOutcome};
use crate::recipes::{BookSource, RecipeBook, RecipeOptions};
use crate::types::{RecipeName, RenderedBar};
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Construction-time defaults for a family of debug bars.
pub trait BarProfile {
    /// Recipe books attached to every new bar, before the init closure runs.
    fn default_recipe_books(&self) -> Vec<BookSource> {
        Vec::new()
    }

    /// Recipes added to every new bar, after the init closure runs.
    fn default_recipes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Where the `layout` and `callback_box` templates come from.
    fn template_source(&self) -> Arc<dyn TemplateSource> {
        Arc::new(TemplateSearchPath::builtin())
    }
}

/// No books, no recipes: everything is added by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseProfile;

impl BarProfile for BaseProfile {}

/// The standard book with params, session and exception boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardProfile;

impl BarProfile for StandardProfile {
    fn default_recipe_books(&self) -> Vec<BookSource> {
        vec![BookSource::Constructor(RecipeBook::standard)]
    }

    fn default_recipes(&self) -> Vec<String> {
        ["params", "session", "exception"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

type InitFn<'a> = Box<dyn FnOnce(&mut DebugBar) -> Result<(), DebugBarError> + 'a>;

pub struct DebugBar {
    recipe_books: Vec<Arc<RecipeBook>>,
    callbacks: Vec<Callback>,
    templates: Arc<dyn TemplateSource>,
    slow_callback: Duration,
}

impl DebugBar {
    /// A bar with no default books, populated with `recipes`.
    pub fn new<I, S>(recipes: I) -> Result<Self, DebugBarError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::configure(&BaseProfile, collect_names(recipes), None)
    }

    /// Like [`DebugBar::new`], running `init` before any recipe is resolved.
    pub fn with_init<I, S, F>(recipes: I, init: F) -> Result<Self, DebugBarError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(&mut DebugBar) -> Result<(), DebugBarError>,
    {
        Self::configure(&BaseProfile, collect_names(recipes), Some(Box::new(init)))
    }

    /// A bar built from `profile`'s defaults plus `recipes`.
    pub fn from_profile<P, I, S>(profile: &P, recipes: I) -> Result<Self, DebugBarError>
    where
        P: BarProfile + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::configure(profile, collect_names(recipes), None)
    }

    pub fn from_profile_with_init<P, I, S, F>(
        profile: &P,
        recipes: I,
        init: F,
    ) -> Result<Self, DebugBarError>
    where
        P: BarProfile + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(&mut DebugBar) -> Result<(), DebugBarError>,
    {
        Self::configure(profile, collect_names(recipes), Some(Box::new(init)))
    }

    /// A bar with the standard recipe book and its default recipes.
    pub fn standard() -> Result<Self, DebugBarError> {
        Self::from_profile(&StandardProfile, std::iter::empty::<&str>())
    }

    // Books first, then init, then recipes: books added by `init` are
    // visible when the recipes are resolved.
    fn configure<P>(
        profile: &P,
        recipes: Vec<String>,
        init: Option<InitFn<'_>>,
    ) -> Result<Self, DebugBarError>
    where
        P: BarProfile + ?Sized,
    {
        let mut bar = DebugBar {
            recipe_books: Vec::new(),
            callbacks: Vec::new(),
            templates: profile.template_source(),
            slow_callback: Duration::from_millis(DEFAULT_SLOW_CALLBACK_MS),
        };

        for book in profile.default_recipe_books() {
            bar.add_recipe_book(book)?;
        }

        if let Some(init) = init {
            init(&mut bar)?;
        }

        let names: IndexSet<String> = profile.default_recipes().into_iter().chain(recipes).collect();
        for name in &names {
            bar.add_recipe(name)?;
        }

        log::debug!(
            "Debug bar configured with {} recipe books and {} callbacks",
            bar.recipe_books.len(),
            bar.callbacks.len()
        );
        Ok(bar)
    }

    /// Attaches a recipe book, constructing it first if needed.
    pub fn add_recipe_book(&mut self, book: impl Into<BookSource>) -> Result<&mut Self, DebugBarError> {
        let book = book.into().into_book()?;
        log::debug!("Attached recipe book {:?}", book.name());
        self.recipe_books.push(book);
        Ok(self)
    }

    /// Names of every recipe known to any attached book.
    pub fn recipes(&self) -> IndexSet<RecipeName> {
        self.recipe_books
            .iter()
            .flat_map(|book| book.recipes())
            .collect()
    }

    /// Builds `name` from the most recently attached book that knows it.
    pub fn recipe_callback(&self, name: &str, options: &RecipeOptions) -> Result<Callback, DebugBarError> {
        let book = self
            .recipe_books
            .iter()
            .rev()
            .find(|book| book.includes(name))
            .ok_or_else(|| DebugBarError::RecipeNotFound {
                name: name.to_string(),
            })?;
        book.build(name, options)
    }

    /// Adds a callback, given either directly or as a recipe name.
    ///
    /// A supplied `callback` is used as-is and `name` is ignored.
    /// Otherwise `name` and `options` are resolved through the attached
    /// recipe books.
    pub fn add_callback(
        &mut self,
        name: Option<&str>,
        options: RecipeOptions,
        callback: Option<Callback>,
    ) -> Result<&mut Self, DebugBarError> {
        let callback = match (callback, name) {
            (Some(callback), _) => callback,
            (None, Some(name)) if !name.trim().is_empty() => self.recipe_callback(name, &options)?,
            (None, Some(_)) => {
                return Err(DebugBarError::InvalidCallback {
                    reason: "recipe name is blank".to_string(),
                })
            }
            (None, None) => {
                return Err(DebugBarError::InvalidCallback {
                    reason: "expected a recipe name or a callback".to_string(),
                })
            }
        };
        self.callbacks.push(callback);
        Ok(self)
    }

    /// Adds the named recipe with default options.
    pub fn add_recipe(&mut self, name: &str) -> Result<&mut Self, DebugBarError> {
        self.add_callback(Some(name), RecipeOptions::new(), None)
    }

    pub fn add_recipe_with(&mut self, name: &str, options: RecipeOptions) -> Result<&mut Self, DebugBarError> {
        self.add_callback(Some(name), options, None)
    }

    /// Adds a closure as a callback.
    pub fn add_fn<F, O>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&dyn RenderContext) -> Result<O, CallbackError> + Send + Sync + 'static,
        O: Into<RenderOutcome>,
    {
        self.callbacks.push(Callback::new(f));
        self
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    pub fn recipe_books(&self) -> &[Arc<RecipeBook>] {
        &self.recipe_books
    }

    /// Replaces where `layout` and `callback_box` are read from.
    pub fn set_template_source(&mut self, templates: Arc<dyn TemplateSource>) -> &mut Self {
        self.templates = templates;
        self
    }

    /// Callbacks slower than `threshold` are logged as warnings.
    pub fn set_slow_callback_threshold(&mut self, threshold: Duration) -> &mut Self {
        self.slow_callback = threshold;
        self
    }

    /// Renders every callback into the layout.
    pub fn render(&self, ctx: &dyn RenderContext) -> Result<RenderedBar, DebugBarError> {
        render_bar(&self.callbacks, ctx, self.templates.as_ref(), self.slow_callback)
    }
}

impl fmt::Debug for DebugBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugBar")
            .field(
                "recipe_books",
                &self.recipe_books.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .field("callbacks", &self.callbacks.len())
            .field("slow_callback", &self.slow_callback)
            .finish()
    }
}

fn collect_names<I, S>(recipes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    recipes.into_iter().map(|s| s.as_ref().to_string()).collect()
}
