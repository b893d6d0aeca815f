mod callback;
mod outcome;

pub use callback::Callback;
pub use outcome::{BoxOptions, DebugBox, RenderOutcome};
