//! Dynworker Core - Wire types and error catalog for the plugin dispatcher.
//!
//! This crate provides:
//! - [`ResponseEnvelope`], the single value returned to the host runtime
//! - [`ErrorMessage`] and [`ErrorKind`], the structured error body
//! - The [`catalog`] of canned, non-leaking error responses
//! - [`ErrorAccumulator`] and [`DiagnosticScope`] for per-invocation
//!   diagnostics that are flushed exactly once
//!
//! Nothing in this crate touches the filesystem or native code.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod catalog;
pub mod diagnostics;
pub mod envelope;
pub mod error;

pub use catalog::CannedError;
pub use diagnostics::{DiagnosticScope, DiagnosticSink, ErrorAccumulator, TracingSink};
pub use envelope::{ErrorBody, ErrorKind, ErrorMessage, ResponseEnvelope, encode_body};
pub use error::{EnvelopeError, EnvelopeResult};
