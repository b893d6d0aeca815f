// src/lib.rs
//! debug-bar library: collects debugging callbacks and renders them as an
//! HTML bar of collapsible boxes.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `DebugBarError`, `CallbackError`, `ValidationError`
//! - **Configuration**: `RenderConfig`, `CommandLineInput`
//! - **The bar**: `DebugBar`, `BarProfile`, `BaseProfile`, `StandardProfile`
//! - **Recipes**: `RecipeBook`, `BookSource`, `RecipeOptions`
//! - **Domain model**: `Callback`, `DebugBox`, `BoxOptions`, `RenderOutcome`
//! - **Domain types**: `RecipeName`, `VariableName`, `BoxId`, `TemplateName`
//! - **Rendering**: `RenderContext`, `RequestContext`, templates, `inject_into_page`

mod bar;
mod config;
mod constants;
mod context;
mod error;
pub mod formatting;
mod model;
mod output;
mod pipeline;
pub mod recipes;
mod types;

// --- Error Handling ---
pub use crate::error::{CallbackError, DebugBarError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, RenderConfig};
pub use crate::constants::{DEFAULT_PARAMS_CUTOFF, DEFAULT_SLOW_CALLBACK_MS, PREFERENCE_COOKIE};

// --- The Bar ---
pub use crate::bar::{BarProfile, BaseProfile, DebugBar, StandardProfile};

// --- Recipes ---
pub use crate::recipes::{BookSource, RecipeBook, RecipeOptions};

// --- Domain Model ---
pub use crate::model::{BoxOptions, Callback, DebugBox, RenderOutcome};

// --- Domain Types ---
pub use crate::types::{BoxId, RecipeName, RenderedBar, TemplateName, VariableName};

// --- Rendering ---
pub use crate::context::{parse_preference_list, RenderContext, RequestContext};
pub use crate::formatting::{
    escape_html, inject_into_page, pretty_print, InMemoryTemplates, TemplateSearchPath,
    TemplateSource,
};

// --- Output ---
pub use crate::output::{
    deliver, Delivered, DeliveryTarget, FailedDelivery, OutputPlan, OutputReport,
};

// --- Pipeline Traits ---
pub use crate::pipeline::{BarComposer, BarDelivery, ContextSource};
