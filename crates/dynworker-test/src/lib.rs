//! Dynworker Test - Shared test doubles for the dispatcher crates.
//!
//! This crate provides an instrumented [`StubModule`] that stands in for the
//! platform dynamic linker, in-process worker entry points, and a
//! [`RecordingSink`] that captures flushed diagnostics.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! dynworker-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use dynworker_core::ErrorAccumulator;
//! use dynworker_plugins::PluginLoader;
//! use dynworker_test::{StubModule, entries, module_file};
//!
//! #[test]
//! fn test_worker_runs() {
//!     let (_dir, path) = module_file();
//!     let module = StubModule::new(entries::ok);
//!     let counters = module.counters();
//!     let loader = PluginLoader::new(module);
//!
//!     let mut diagnostics = ErrorAccumulator::new();
//!     let response = loader.run(&path, "{}", &mut diagnostics).unwrap();
//!
//!     assert_eq!(response.status_code, 200);
//!     assert!(counters.balanced());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod entries;
pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
