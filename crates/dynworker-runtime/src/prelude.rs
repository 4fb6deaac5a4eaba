//! Prelude module - commonly used types for convenient import.
//!
//! Use `use dynworker_runtime::prelude::*;` to import all essential types.

pub use crate::{DispatchError, DispatchHandler, DispatchResult};

pub use dynworker_core::{ResponseEnvelope, TracingSink};
pub use dynworker_telemetry::InvocationContext;
