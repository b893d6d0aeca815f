// src/output/types.rs
//! Destinations for a rendered bar and the outcome of delivering to them.

use crate::error::DebugBarError;
use std::fmt;
use std::path::PathBuf;

/// Where a rendered bar is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Write the content to a file, creating parent directories.
    File(PathBuf),
    Stdout,
}

impl fmt::Display for DeliveryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryTarget::File(path) => write!(f, "{}", path.display()),
            DeliveryTarget::Stdout => f.write_str("stdout"),
        }
    }
}

/// One piece of content and every destination it goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    content: String,
    targets: Vec<DeliveryTarget>,
}

impl OutputPlan {
    /// A plan with no destinations yet.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            targets: Vec::new(),
        }
    }

    /// Plans delivery to each file, and to stdout when asked or when there
    /// are no files at all.
    pub fn for_destinations(
        content: impl Into<String>,
        files: &[PathBuf],
        echo_stdout: bool,
    ) -> Self {
        let mut plan = files
            .iter()
            .cloned()
            .fold(Self::new(content), |plan, path| plan.to(DeliveryTarget::File(path)));
        if echo_stdout || files.is_empty() {
            plan = plan.to(DeliveryTarget::Stdout);
        }
        plan
    }

    /// Adds a destination; a destination already in the plan is ignored.
    pub fn to(mut self, target: DeliveryTarget) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn targets(&self) -> &[DeliveryTarget] {
        &self.targets
    }
}

/// A destination that received the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub target: DeliveryTarget,
    pub bytes_written: usize,
}

/// A destination that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelivery {
    pub target: DeliveryTarget,
    pub error: String,
}

/// Result of executing an output plan.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    delivered: Vec<Delivered>,
    failed: Vec<FailedDelivery>,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_delivered(&mut self, target: DeliveryTarget, bytes_written: usize) {
        self.delivered.push(Delivered {
            target,
            bytes_written,
        });
    }

    pub(crate) fn record_failed(&mut self, target: DeliveryTarget, error: String) {
        self.failed.push(FailedDelivery { target, error });
    }

    pub fn delivered(&self) -> &[Delivered] {
        &self.delivered
    }

    pub fn failed(&self) -> &[FailedDelivery] {
        &self.failed
    }

    /// True when every destination received the content.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total bytes written across all destinations.
    pub fn bytes_written(&self) -> usize {
        self.delivered.iter().map(|d| d.bytes_written).sum()
    }

    /// Turns any failed destination into a `DeliveryFailed` error.
    pub fn into_result(self) -> Result<Self, DebugBarError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(DebugBarError::DeliveryFailed {
            failures: self
                .failed
                .iter()
                .map(|f| format!("{}: {}", f.target, f.error))
                .collect(),
        })
    }
}
