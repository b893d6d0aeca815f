// src/model/callback.rs

use super::RenderOutcome;
use crate::context::RenderContext;
use crate::error::CallbackError;
use std::fmt;
use std::sync::Arc;

type CallbackFn = dyn Fn(&dyn RenderContext) -> Result<RenderOutcome, CallbackError> + Send + Sync;

/// A diagnostic callback: produces one box from a render context.
///
/// Cloning is cheap and yields a handle to the same function.
#[derive(Clone)]
pub struct Callback {
    inner: Arc<CallbackFn>,
}

impl Callback {
    /// Wraps a function whose result converts into a [`RenderOutcome`].
    ///
    /// ```ignore
    /// let cb = Callback::new(|ctx| {
    ///     let params = ctx.lookup("params")?;
    ///     Ok(("Params", params.to_string()))
    /// });
    /// ```
    pub fn new<F, O>(f: F) -> Self
    where
        F: Fn(&dyn RenderContext) -> Result<O, CallbackError> + Send + Sync + 'static,
        O: Into<RenderOutcome>,
    {
        Self {
            inner: Arc::new(move |ctx| f(ctx).map(Into::into)),
        }
    }

    pub fn call(&self, ctx: &dyn RenderContext) -> Result<RenderOutcome, CallbackError> {
        (self.inner)(ctx)
    }

    /// True when both handles point at the same function.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("fn", &Arc::as_ptr(&self.inner))
            .finish()
    }
}
