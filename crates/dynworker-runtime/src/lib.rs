//! Dynworker Runtime - The invocation handler.
//!
//! [`DispatchHandler`] turns one request event into one
//! [`ResponseEnvelope`](dynworker_core::ResponseEnvelope). It never fails:
//! every error is recorded as a diagnostic and answered with the catalog's
//! internal error.
//!
//! # Example
//!
//! ```rust,no_run
//! use dynworker_runtime::DispatchHandler;
//!
//! # async fn run() {
//! let handler = DispatchHandler::native();
//! let response = handler.handle(r#"{"rawPath":"/items"}"#).await;
//! println!("{}", response.status_code);
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod handler;

pub use error::{DispatchError, DispatchResult};
pub use handler::{DispatchHandler, FALLBACK_RESPONSE_JSON};
