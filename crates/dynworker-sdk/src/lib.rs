//! Plugin-side ABI for dynworker native worker modules.
//!
//! A worker module is a `cdylib` that exports exactly one symbol,
//! [`ENTRY_SYMBOL`], with the signature [`EntryFn`]. The host calls it once
//! per invocation, takes ownership of the returned [`WorkerBuilder`], builds a
//! [`Worker`] and runs it against the raw event.
//!
//! ```rust,ignore
//! use dynworker_sdk::{Worker, WorkerBuilder, export_worker};
//!
//! struct Echo;
//!
//! impl Worker for Echo {
//!     fn run(&mut self, event: &str) -> u32 {
//!         if event.is_empty() { 400 } else { 200 }
//!     }
//! }
//!
//! struct EchoBuilder;
//!
//! impl WorkerBuilder for EchoBuilder {
//!     fn build(self: Box<Self>) -> Box<dyn Worker> {
//!         Box::new(Echo)
//!     }
//! }
//!
//! export_worker!(EchoBuilder);
//! ```
//!
//! # Trust model
//!
//! The boundary passes Rust trait objects, so the host and the module must be
//! compiled with the same toolchain and the same version of this crate. The
//! host does not check this; modules come from a controlled build pipeline.
//!
//! # Panics
//!
//! A module links its own `std`, so its panics cannot unwind into the host.
//! [`export_worker!`] wraps the builder in a [`GuardedBuilder`], which catches
//! panics inside the module:
//!
//! - a panic while evaluating the builder expression makes the entry point
//!   return null;
//! - a panic in [`WorkerBuilder::build`] or [`Worker::run`] makes the worker
//!   return [`PANICKED_CODE`];
//! - a panic in [`Worker::body`] yields no body.
//!
//! The host answers all of these with an internal error. Modules that bypass
//! the macro must contain their own panics.

#![deny(clippy::all)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod abi;
mod guard;
mod worker;

pub use abi::{ENTRY_SYMBOL, EntryFn, from_raw_builder, into_raw_builder};
#[doc(hidden)]
pub use guard::export_builder;
pub use guard::{GuardedBuilder, PANICKED_CODE};
pub use worker::{Worker, WorkerBuilder};

/// Export a [`WorkerBuilder`] expression as the module entry point.
///
/// Expands to an `extern "C" fn createPlugin()` that boxes the builder behind
/// a [`GuardedBuilder`] and hands ownership to the host. The expression is
/// evaluated on every call.
#[macro_export]
macro_rules! export_worker {
    ($builder:expr) => {
        /// Entry point resolved by the dynworker host.
        #[allow(non_snake_case)]
        #[unsafe(no_mangle)]
        pub extern "C" fn createPlugin() -> *mut ::core::ffi::c_void {
            $crate::export_builder(|| {
                ::std::boxed::Box::new($builder)
                    as ::std::boxed::Box<dyn $crate::WorkerBuilder>
            })
        }
    };
}
