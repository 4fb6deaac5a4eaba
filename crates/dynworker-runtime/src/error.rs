//! Dispatch error types.

use dynworker_plugins::{LocatorError, PluginError};

/// Anything that turns an invocation into the internal error response.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The module could not be located.
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// The module could not be loaded or run.
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
