//! Plugin error types.

use std::path::PathBuf;

/// Errors from locating a worker module.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// No regular file exists at the configured path.
    #[error("module not found: {}", .0.display())]
    ModuleNotFound(PathBuf),

    /// The path exists but its metadata could not be read.
    #[error("module inaccessible at {}: {source}", .path.display())]
    Inaccessible {
        /// Path that was checked.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from loading and running a worker module.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The dynamic loader failed without a diagnostic.
    #[error("error opening library at {}", .path.display())]
    LibraryOpen {
        /// Module path.
        path: PathBuf,
    },

    /// The dynamic loader failed and reported a diagnostic.
    #[error("error opening library at {}: {message}", .path.display())]
    LibraryOpenWithMessage {
        /// Module path.
        path: PathBuf,
        /// Loader diagnostic.
        message: String,
    },

    /// The entry symbol could not be resolved.
    #[error("error loading symbol '{symbol}' from {}", .path.display())]
    SymbolLoad {
        /// Symbol name.
        symbol: String,
        /// Module path.
        path: PathBuf,
    },

    /// The entry point returned a null builder.
    #[error("entry point '{symbol}' in {} returned a null builder", .path.display())]
    NullBuilder {
        /// Symbol name.
        symbol: String,
        /// Module path.
        path: PathBuf,
    },

    /// The worker panicked while building or running.
    #[error("worker panicked in {}: {message}", .path.display())]
    WorkerPanicked {
        /// Module path.
        path: PathBuf,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The worker returned a code that is not an HTTP status.
    #[error("worker returned invalid status code {0}")]
    InvalidStatus(u32),

    /// Unloading the module failed.
    #[error("error closing library at {}: {message}", .path.display())]
    LibraryClose {
        /// Module path.
        path: PathBuf,
        /// Loader diagnostic.
        message: String,
    },

    /// The blocking task running the module did not complete.
    #[error("plugin task failed: {0}")]
    Join(String),
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Result type for module location.
pub type LocatorResult<T> = Result<T, LocatorError>;
