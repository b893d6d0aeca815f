// src/formatting/renderer.rs
//! The render pipeline: run callbacks, decide visibility, emit markup.
//!
//! Each callback runs inside a failure boundary. An `Err` or a panic
//! becomes an error box and the remaining callbacks still render, so one
//! broken diagnostic never blanks the page. Template problems, on the other
//! hand, are fatal: without `layout` there is nothing to return.

use super::escape_html;
use super::templates::{TemplateEngine, TemplateSource};
use crate::constants::{
    BOX_SEPARATOR, CALLBACK_BOX_TEMPLATE, ERROR_BOX_TITLE, ERROR_LINE_SEPARATOR, LAYOUT_TEMPLATE,
};
use crate::context::RenderContext;
use crate::error::{CallbackError, DebugBarError};
use crate::model::{BoxOptions, Callback, DebugBox, RenderOutcome};
use crate::types::{RenderedBar, TemplateName};
use serde::Serialize;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::{Duration, Instant};

thread_local! {
    /// Set while a callback runs on this thread.
    static INSIDE_BOUNDARY: Cell<bool> = const { Cell::new(false) };
    /// Backtrace taken by the panic hook for the boundary to pick up.
    static PANIC_BACKTRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static INSTALL_PANIC_HOOK: Once = Once::new();

/// Data handed to the `callback_box` template.
#[derive(Debug, Serialize)]
struct BoxView<'a> {
    title: &'a str,
    content: &'a str,
    hidden: bool,
    id: Option<&'a str>,
}

/// Data handed to the `layout` template.
#[derive(Debug, Serialize)]
struct LayoutView {
    content: String,
}

/// Renders every callback and wraps the boxes in the layout.
pub fn render_bar(
    callbacks: &[Callback],
    ctx: &dyn RenderContext,
    templates: &dyn TemplateSource,
    slow_callback: Duration,
) -> Result<RenderedBar, DebugBarError> {
    let layout = TemplateName::new(LAYOUT_TEMPLATE)?;
    let callback_box = TemplateName::new(CALLBACK_BOX_TEMPLATE)?;
    let engine = TemplateEngine::load(templates, &[&layout, &callback_box])?;

    let shown: HashSet<String> = ctx.preference_list().into_iter().collect();
    let mut boxes = Vec::with_capacity(callbacks.len());
    let mut failures = 0;

    for (index, callback) in callbacks.iter().enumerate() {
        match invoke_callback(index, callback, ctx, slow_callback) {
            Ok(RenderOutcome::Box(debug_box)) => {
                boxes.push(render_callback_box(&engine, &debug_box, &shown)?);
            }
            Ok(RenderOutcome::Skip) => {
                log::debug!("Callback #{} had nothing to show", index);
            }
            Err(error) => {
                failures += 1;
                log::warn!("Callback #{} failed: {}", index, error);
                boxes.push(render_callback_box(&engine, &error_box(&error), &shown)?);
            }
        }
    }

    log::info!(
        "Rendered debug bar: {} boxes from {} callbacks ({} failed)",
        boxes.len(),
        callbacks.len(),
        failures
    );

    let html = engine.render(
        &layout,
        &LayoutView {
            content: boxes.join(BOX_SEPARATOR),
        },
    )?;
    Ok(RenderedBar::new(html, boxes.len()))
}

/// Renders one box with its visibility resolved against `shown`.
pub fn render_callback_box(
    engine: &TemplateEngine,
    debug_box: &DebugBox,
    shown: &HashSet<String>,
) -> Result<String, DebugBarError> {
    let callback_box = TemplateName::new(CALLBACK_BOX_TEMPLATE)?;
    let view = BoxView {
        title: &debug_box.title,
        content: &debug_box.content,
        hidden: resolve_hidden(&debug_box.options, shown),
        id: debug_box.options.id.as_ref().map(|id| id.as_str()),
    };
    engine.render(&callback_box, &view)
}

/// Whether a box starts collapsed.
///
/// An explicit `hidden` always wins. Otherwise a box without an id is
/// hidden, and a box with an id is shown only if the client kept it open.
pub fn resolve_hidden(options: &BoxOptions, shown: &HashSet<String>) -> bool {
    options.hidden.unwrap_or_else(|| match &options.id {
        None => true,
        Some(id) => !shown.contains(id.as_str()),
    })
}

/// Runs one callback, containing both errors and panics.
fn invoke_callback(
    index: usize,
    callback: &Callback,
    ctx: &dyn RenderContext,
    slow_callback: Duration,
) -> Result<RenderOutcome, CallbackError> {
    let started = Instant::now();
    let result = contain_panics(|| callback.call(ctx));

    let elapsed = started.elapsed();
    if elapsed > slow_callback {
        log::warn!(
            "Callback #{} took {:?} (threshold {:?})",
            index,
            elapsed,
            slow_callback
        );
    }

    result
}

/// Runs `f`, turning a panic into a `CallbackError` with the panicking
/// frames attached.
fn contain_panics<T>(f: impl FnOnce() -> Result<T, CallbackError>) -> Result<T, CallbackError> {
    install_panic_hook();
    let was_inside = INSIDE_BOUNDARY.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    INSIDE_BOUNDARY.with(|flag| flag.set(was_inside));

    result.unwrap_or_else(|payload| {
        let backtrace = PANIC_BACKTRACE
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(Backtrace::force_capture);
        Err(CallbackError::from_panic(payload, backtrace))
    })
}

/// Chains a hook in front of the existing one. Panics inside a callback
/// are recorded for the error box instead of printed; every other panic
/// goes to the previous hook untouched.
fn install_panic_hook() {
    INSTALL_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if INSIDE_BOUNDARY.with(Cell::get) {
                log::debug!("Callback panicked: {}", info);
                PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(Backtrace::force_capture()));
            } else {
                previous(info);
            }
        }));
    });
}

/// The box shown in place of a failed callback.
fn error_box(error: &CallbackError) -> DebugBox {
    let headline = format!("{}: {}", error.type_name(), error.message());
    let lines: Vec<String> = std::iter::once(headline)
        .chain(error.backtrace_lines())
        .map(|line| escape_html(&line))
        .collect();
    DebugBox::new(ERROR_BOX_TITLE, lines.join(ERROR_LINE_SEPARATOR))
}
