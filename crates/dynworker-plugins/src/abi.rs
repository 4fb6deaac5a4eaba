//! Host side of the entry point hand-off.

#![allow(unsafe_code)]

use std::path::Path;
use std::ptr::NonNull;

use dynworker_sdk::{EntryFn, WorkerBuilder, from_raw_builder};

use crate::error::{PluginError, PluginResult};

/// Call the module's entry point and take ownership of the builder it returns.
///
/// The caller must keep the module open until the builder, and anything built
/// from it, has been dropped.
pub(crate) fn take_builder(
    entry: EntryFn,
    symbol: &str,
    path: &Path,
) -> PluginResult<Box<dyn WorkerBuilder>> {
    // SAFETY: `entry` was resolved from a module that is still open and is
    // trusted to have the `EntryFn` signature.
    let raw = unsafe { entry() };
    let raw = NonNull::new(raw).ok_or_else(|| PluginError::NullBuilder {
        symbol: symbol.to_owned(),
        path: path.to_path_buf(),
    })?;
    // SAFETY: a non-null return from the entry point is a pointer produced by
    // `into_raw_builder`, and it is reclaimed exactly once here.
    Ok(unsafe { from_raw_builder(raw) })
}
