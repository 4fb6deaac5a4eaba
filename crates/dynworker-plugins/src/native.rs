//! The dynamic loader capability.
//!
//! [`NativeModule`] is the narrow seam between the loader protocol and the
//! platform's dynamic linker. [`LibloadingModule`] is the production
//! implementation; tests substitute an instrumented stub.

#![allow(unsafe_code)]

use std::path::Path;

use dynworker_sdk::EntryFn;
use libloading::Library;
use tracing::debug;

use crate::error::{PluginError, PluginResult};

/// Open, resolve and close native modules.
pub trait NativeModule: Send + Sync + 'static {
    /// An open module. Closing consumes it.
    type Handle;

    /// Open the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::LibraryOpen`] or
    /// [`PluginError::LibraryOpenWithMessage`] if the loader fails.
    fn open(&self, path: &Path) -> PluginResult<Self::Handle>;

    /// Resolve the entry point `symbol` in an open module.
    ///
    /// The returned function pointer is only valid until `handle` is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::SymbolLoad`] if the symbol is missing.
    fn resolve_entry(&self, handle: &Self::Handle, path: &Path, symbol: &str)
    -> PluginResult<EntryFn>;

    /// Close an open module.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::LibraryClose`] if the loader reports a failure.
    fn close(&self, handle: Self::Handle, path: &Path) -> PluginResult<()>;
}

/// [`NativeModule`] backed by `libloading`.
///
/// On Unix modules are opened with `RTLD_NOW | RTLD_LOCAL` so symbols from one
/// load never leak into the global namespace of another.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibloadingModule;

impl NativeModule for LibloadingModule {
    type Handle = Library;

    fn open(&self, path: &Path) -> PluginResult<Library> {
        // SAFETY: running a module's initialisers is inherently unsafe; modules
        // come from a controlled build pipeline.
        let opened = unsafe { open_local(path) };
        opened.map_err(|e| match e {
            libloading::Error::DlOpenUnknown | libloading::Error::LoadLibraryExWUnknown => {
                PluginError::LibraryOpen {
                    path: path.to_path_buf(),
                }
            },
            other => PluginError::LibraryOpenWithMessage {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })
    }

    fn resolve_entry(&self, handle: &Library, path: &Path, symbol: &str) -> PluginResult<EntryFn> {
        // SAFETY: the symbol is assumed to have the `EntryFn` signature. A
        // mismatch is undefined behaviour and cannot be detected here.
        let entry = unsafe { handle.get::<EntryFn>(symbol.as_bytes()) }.map_err(|e| {
            debug!(symbol, path = %path.display(), error = %e, "symbol lookup failed");
            PluginError::SymbolLoad {
                symbol: symbol.to_owned(),
                path: path.to_path_buf(),
            }
        })?;
        Ok(*entry)
    }

    fn close(&self, handle: Library, path: &Path) -> PluginResult<()> {
        handle.close().map_err(|e| PluginError::LibraryClose {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(unix)]
unsafe fn open_local(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_LOCAL, RTLD_NOW};

    // SAFETY: forwarded from the caller.
    unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_LOCAL) }.map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_local(path: &Path) -> Result<Library, libloading::Error> {
    // SAFETY: forwarded from the caller.
    unsafe { Library::new(path) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_library_reports_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libmissing.so");

        let err = LibloadingModule.open(&path).unwrap_err();
        match err {
            PluginError::LibraryOpenWithMessage { path: p, message } => {
                assert_eq!(p, path);
                assert!(!message.is_empty());
            },
            PluginError::LibraryOpen { path: p } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_non_library_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libWorkerPlugin.so");
        std::fs::write(&path, b"this is not a shared object").unwrap();

        let err = LibloadingModule.open(&path).unwrap_err();
        assert!(matches!(
            err,
            PluginError::LibraryOpen { .. } | PluginError::LibraryOpenWithMessage { .. }
        ));
    }
}
