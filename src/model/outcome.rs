// src/model/outcome.rs
//! What a callback hands back to the renderer.
//!
//! A callback either produces a box or declines to show one. Bare strings
//! and `(title, content)` tuples convert into a box at the callback
//! boundary, so the renderer only ever sees the tagged [`RenderOutcome`].

use crate::constants::DEFAULT_BOX_TITLE;
use crate::types::BoxId;
use serde::Serialize;

/// Per-box options returned by a callback.
///
/// `hidden` left as `None` means "use the computed default", which
/// depends on `id` and the client's preference list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoxOptions {
    pub hidden: Option<bool>,
    pub id: Option<BoxId>,
}

impl BoxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn id(mut self, id: BoxId) -> Self {
        self.id = Some(id);
        self
    }
}

/// A single box: title, HTML content and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugBox {
    pub title: String,
    pub content: String,
    pub options: BoxOptions,
}

impl DebugBox {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            options: BoxOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BoxOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result of running one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Box(DebugBox),
    /// Nothing to show this time, e.g. no exception was raised.
    Skip,
}

impl RenderOutcome {
    pub fn as_box(&self) -> Option<&DebugBox> {
        match self {
            RenderOutcome::Box(b) => Some(b),
            RenderOutcome::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, RenderOutcome::Skip)
    }
}

impl From<DebugBox> for RenderOutcome {
    fn from(b: DebugBox) -> Self {
        RenderOutcome::Box(b)
    }
}

impl From<String> for RenderOutcome {
    fn from(content: String) -> Self {
        RenderOutcome::Box(DebugBox::new(DEFAULT_BOX_TITLE, content))
    }
}

impl From<&str> for RenderOutcome {
    fn from(content: &str) -> Self {
        RenderOutcome::from(content.to_string())
    }
}

impl<T, C> From<(T, C)> for RenderOutcome
where
    T: Into<String>,
    C: Into<String>,
{
    fn from((title, content): (T, C)) -> Self {
        RenderOutcome::Box(DebugBox::new(title, content))
    }
}

impl<T, C> From<(T, C, BoxOptions)> for RenderOutcome
where
    T: Into<String>,
    C: Into<String>,
{
    fn from((title, content, options): (T, C, BoxOptions)) -> Self {
        RenderOutcome::Box(DebugBox::new(title, content).with_options(options))
    }
}

impl<O> From<Option<O>> for RenderOutcome
where
    O: Into<RenderOutcome>,
{
    fn from(outcome: Option<O>) -> Self {
        outcome.map(Into::into).unwrap_or(RenderOutcome::Skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_gets_default_title() {
        let outcome = RenderOutcome::from("just content");
        let b = outcome.as_box().unwrap();
        assert_eq!(b.title, "Debug");
        assert_eq!(b.content, "just content");
        assert_eq!(b.options, BoxOptions::default());
    }

    #[test]
    fn test_pair_means_empty_options() {
        let outcome = RenderOutcome::from(("foo", "bar"));
        assert_eq!(
            outcome,
            RenderOutcome::Box(DebugBox::new("foo", "bar"))
        );
    }

    #[test]
    fn test_triple_keeps_options() {
        let options = BoxOptions::new()
            .hidden(false)
            .id(BoxId::new("session").unwrap());
        let outcome = RenderOutcome::from(("Session", "{}", options.clone()));
        assert_eq!(outcome.as_box().unwrap().options, options);
    }

    #[test]
    fn test_none_is_skip() {
        let outcome = RenderOutcome::from(None::<DebugBox>);
        assert!(outcome.is_skip());
        assert!(outcome.as_box().is_none());
    }
}
