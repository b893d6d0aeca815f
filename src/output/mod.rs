// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Planning which destinations receive the rendered bar is pure; the
//! writer is the only place that touches the filesystem or stdout.

mod types;
mod writer;

pub use types::{Delivered, DeliveryTarget, FailedDelivery, OutputPlan, OutputReport};
pub use writer::deliver;
