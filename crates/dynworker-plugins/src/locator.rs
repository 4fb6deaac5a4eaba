//! Resolve the worker module on the shared filesystem.
//!
//! The filesystem is managed externally and may change between invocations
//! (e.g. during a deployment rollout), so every call re-checks the path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LocatorError, LocatorResult};

/// Default location of the worker module on the shared mount.
pub const DEFAULT_MODULE_PATH: &str = "/mnt/efs/modules/libWorkerPlugin.so";

/// Resolves the module path for one invocation.
#[derive(Debug, Clone)]
pub struct ModuleLocator {
    path: PathBuf,
}

impl ModuleLocator {
    /// Create a locator for a fixed module path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this locator checks.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Confirm a regular file exists at the configured path and return it.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::ModuleNotFound`] if nothing, or something other
    /// than a regular file, exists at the path, and
    /// [`LocatorError::Inaccessible`] if the metadata lookup fails for another
    /// reason.
    pub async fn resolve(&self) -> LocatorResult<PathBuf> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) if metadata.is_file() => {
                debug!(path = %self.path.display(), "resolved worker module");
                Ok(self.path.clone())
            },
            Ok(_) => Err(LocatorError::ModuleNotFound(self.path.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(LocatorError::ModuleNotFound(self.path.clone()))
            },
            Err(source) => Err(LocatorError::Inaccessible {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Default for ModuleLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_PATH)
    }
}
