//! Prelude module - commonly used types for convenient import.
//!
//! Use `use dynworker_core::prelude::*;` to import all essential types.

// Envelope
pub use crate::{ErrorBody, ErrorKind, ErrorMessage, ResponseEnvelope, encode_body};

// Catalog
pub use crate::CannedError;

// Diagnostics
pub use crate::{DiagnosticScope, DiagnosticSink, ErrorAccumulator, TracingSink};

// Errors
pub use crate::{EnvelopeError, EnvelopeResult};
