//! Native worker modules for the dynworker dispatcher.
//!
//! Provides the pieces that cross the process/ABI boundary:
//!
//! - [`ModuleLocator`]: confirms the module is present on the shared filesystem
//! - [`NativeModule`]: open / resolve / close capability, with the
//!   `libloading`-backed [`LibloadingModule`]
//! - [`PluginLoader`]: the load → resolve → build → run → unload protocol
//!
//! # Scaling
//!
//! Nothing is cached. Every invocation opens and closes the module, and two
//! concurrent invocations load the same path independently.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod abi;
pub mod error;
pub mod loader;
pub mod locator;
pub mod native;

pub use error::{LocatorError, LocatorResult, PluginError, PluginResult};
pub use loader::PluginLoader;
pub use locator::{DEFAULT_MODULE_PATH, ModuleLocator};
pub use native::{LibloadingModule, NativeModule};
