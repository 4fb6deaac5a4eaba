//! Prelude module - commonly used types for convenient import.
//!
//! Use `use dynworker_plugins::prelude::*;` to import all essential types.

// Errors
pub use crate::{LocatorError, LocatorResult, PluginError, PluginResult};

// Location and loading
pub use crate::{DEFAULT_MODULE_PATH, LibloadingModule, ModuleLocator, NativeModule, PluginLoader};
