// src/constants.rs
//! Domain constants that define how the debug bar looks and behaves.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! these should tell you how a box is titled, where templates live, and
//! which cookie remembers the boxes a developer left open.

// ---------------------------------------------------------------------------
// Box titles
// ---------------------------------------------------------------------------

/// Title given to a box whose callback returned bare content.
pub const DEFAULT_BOX_TITLE: &str = "Debug";

/// Title of the box synthesized when a callback fails.
pub const ERROR_BOX_TITLE: &str = "**ERROR**";

/// Separator placed between lines of an error box (message, then backtrace).
pub const ERROR_LINE_SEPARATOR: &str = "<br/>";

/// Separator placed between rendered boxes inside the layout.
pub const BOX_SEPARATOR: &str = "\n";

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Extension appended to every symbolic template name before lookup.
pub const TEMPLATE_EXTENSION: &str = "html.hbs";

/// Template that wraps the concatenated boxes.
pub const LAYOUT_TEMPLATE: &str = "layout";

/// Template that wraps a single box.
pub const CALLBACK_BOX_TEMPLATE: &str = "callback_box";

/// Sub-template the standard recipe book renders key/value tables with.
pub const RECIPE_TABLE_TEMPLATE: &str = "table";

// ---------------------------------------------------------------------------
// Client preferences
// ---------------------------------------------------------------------------

/// Cookie holding the comma-separated ids of boxes the client kept open.
pub const PREFERENCE_COOKIE: &str = "debug_bar";

/// Separator between ids in the preference cookie.
pub const PREFERENCE_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// Recipe defaults
// ---------------------------------------------------------------------------

/// Pretty-printed params longer than this start collapsed.
pub const DEFAULT_PARAMS_CUTOFF: usize = 160;

/// Callbacks slower than this are reported in the log.
///
/// Callbacks run synchronously and cannot be interrupted, so this is a
/// reporting threshold, not a deadline.
pub const DEFAULT_SLOW_CALLBACK_MS: u64 = 250;
