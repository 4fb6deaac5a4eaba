//! Dynworker Telemetry - Logging and tracing for the dynworker dispatcher.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats
//! - [`InvocationContext`] for correlating everything one invocation logs
//!
//! # Example
//!
//! ```rust,no_run
//! use dynworker_telemetry::{InvocationContext, LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), dynworker_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("dynworker_plugins=debug");
//!
//! setup_logging(&config)?;
//!
//! let ctx = InvocationContext::new().with_request_id("c0ffee");
//! let _guard = ctx.span().entered();
//! tracing::info!("dispatching");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::InvocationContext;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
