// src/pipeline.rs
//! Pipeline capability traits for rendering a bar outside a web host:
//! load context, compose, deliver.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::context::{RenderContext, RequestContext};
use crate::error::DebugBarError;
use crate::output::OutputReport;
use crate::types::RenderedBar;

/// Produces the environment the bar is rendered in.
pub trait ContextSource {
    fn load(&self) -> Result<RequestContext, DebugBarError>;
}

/// Renders a bar against a context.
pub trait BarComposer {
    fn compose(&self, ctx: &dyn RenderContext) -> Result<RenderedBar, DebugBarError>;
}

/// Delivers a rendered bar to its destinations.
pub trait BarDelivery {
    fn deliver(&self, bar: RenderedBar) -> Result<OutputReport, DebugBarError>;
}
