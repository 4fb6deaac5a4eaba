//! Load a worker module, run it against one event, and unload it.
//!
//! # Protocol
//!
//! 1. Open the module.
//! 2. Resolve the entry symbol.
//! 3. Call the entry point and take ownership of the builder.
//! 4. Build the worker.
//! 5. Run the worker against the event.
//! 6. Close the module, whatever happened in steps 2-5.
//! 7. Map the worker's code to the response status.
//!
//! Modules built with `export_worker!` contain their own panics and report
//! them as `PANICKED_CODE`. The `catch_unwind` here only covers builders that
//! share the host's `std`, such as in-process workers.
//!
//! The builder and worker are dropped before the module is closed, since
//! their code and vtables live inside it. A failure to close is recorded as a
//! diagnostic and never replaces the outcome.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;

use dynworker_core::{ErrorAccumulator, ResponseEnvelope};
use dynworker_sdk::{ENTRY_SYMBOL, PANICKED_CODE};
use tracing::{debug, info};

use crate::abi::take_builder;
use crate::error::{PluginError, PluginResult};
use crate::native::{LibloadingModule, NativeModule};

/// Lowest status code a worker may return.
const MIN_STATUS: u16 = 100;
/// Highest status code a worker may return.
const MAX_STATUS: u16 = 999;

/// Runs worker modules through a [`NativeModule`] backend.
///
/// Holds no per-invocation state; every call opens and closes the module.
pub struct PluginLoader<M: NativeModule = LibloadingModule> {
    module: Arc<M>,
    entry_symbol: String,
}

impl<M: NativeModule> Clone for PluginLoader<M> {
    fn clone(&self) -> Self {
        Self {
            module: Arc::clone(&self.module),
            entry_symbol: self.entry_symbol.clone(),
        }
    }
}

impl PluginLoader<LibloadingModule> {
    /// Create a loader backed by the platform dynamic linker.
    #[must_use]
    pub fn native() -> Self {
        Self::new(LibloadingModule)
    }
}

impl<M: NativeModule> PluginLoader<M> {
    /// Create a loader using the default entry symbol.
    #[must_use]
    pub fn new(module: M) -> Self {
        Self {
            module: Arc::new(module),
            entry_symbol: ENTRY_SYMBOL.to_owned(),
        }
    }

    /// Override the entry symbol name.
    #[must_use]
    pub fn with_entry_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.entry_symbol = symbol.into();
        self
    }

    /// The entry symbol this loader resolves.
    #[must_use]
    pub fn entry_symbol(&self) -> &str {
        &self.entry_symbol
    }

    /// The backend used to open modules.
    #[must_use]
    pub fn module(&self) -> &M {
        &self.module
    }

    /// Run the module at `path` against `event` on the blocking thread pool.
    ///
    /// Diagnostics recorded while running are appended to `diagnostics`.
    ///
    /// # Errors
    ///
    /// Returns the [`PluginError`] from [`PluginLoader::run`], or
    /// [`PluginError::Join`] if the blocking task did not complete.
    pub async fn load(
        &self,
        path: &Path,
        event: &str,
        diagnostics: &mut ErrorAccumulator,
    ) -> PluginResult<ResponseEnvelope> {
        let loader = self.clone();
        let path = path.to_path_buf();
        let event = event.to_owned();

        let (outcome, recorded) = tokio::task::spawn_blocking(move || {
            let mut recorded = ErrorAccumulator::new();
            let outcome = loader.run(&path, &event, &mut recorded);
            (outcome, recorded)
        })
        .await
        .map_err(|e| PluginError::Join(e.to_string()))?;

        diagnostics.extend(recorded);
        outcome
    }

    /// Run the module at `path` against `event` on the current thread.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] if the module cannot be opened, the entry
    /// symbol is missing or returns null, the worker panics, or the worker's
    /// code is not a valid status.
    pub fn run(
        &self,
        path: &Path,
        event: &str,
        diagnostics: &mut ErrorAccumulator,
    ) -> PluginResult<ResponseEnvelope> {
        let handle = self.module.open(path)?;
        debug!(path = %path.display(), "opened worker module");

        let mut opened = OpenModule {
            module: self.module.as_ref(),
            handle: Some(handle),
            path,
            diagnostics,
        };
        self.invoke(&mut opened, event)
    }

    fn invoke(&self, opened: &mut OpenModule<'_, M>, event: &str) -> PluginResult<ResponseEnvelope> {
        let path = opened.path;
        let entry = self
            .module
            .resolve_entry(opened.handle(), path, &self.entry_symbol)?;
        let builder = take_builder(entry, &self.entry_symbol, path)?;

        let (code, body) = catch_unwind(AssertUnwindSafe(|| {
            let mut worker = builder.build();
            let code = worker.run(event);
            (code, worker.body())
        }))
        .map_err(|payload| PluginError::WorkerPanicked {
            path: path.to_path_buf(),
            message: panic_message(payload.as_ref()),
        })?;

        if code == PANICKED_CODE {
            return Err(PluginError::WorkerPanicked {
                path: path.to_path_buf(),
                message: "panic contained inside the module".to_owned(),
            });
        }
        let status = status_from_code(code)?;
        info!(path = %path.display(), status, "worker completed");

        Ok(ResponseEnvelope {
            body: validated_body(body, opened.diagnostics),
            ..ResponseEnvelope::new(status)
        })
    }
}

/// An open module that is closed when dropped.
struct OpenModule<'a, M: NativeModule> {
    module: &'a M,
    handle: Option<M::Handle>,
    path: &'a Path,
    diagnostics: &'a mut ErrorAccumulator,
}

impl<M: NativeModule> OpenModule<'_, M> {
    fn handle(&self) -> &M::Handle {
        // Only `drop` takes the handle.
        self.handle
            .as_ref()
            .unwrap_or_else(|| unreachable!("module handle taken before drop"))
    }
}

impl<M: NativeModule> Drop for OpenModule<'_, M> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        match self.module.close(handle, self.path) {
            Ok(()) => debug!(path = %self.path.display(), "closed worker module"),
            Err(e) => self.diagnostics.push(e.to_string()),
        }
    }
}

fn status_from_code(code: u32) -> PluginResult<u16> {
    u16::try_from(code)
        .ok()
        .filter(|status| (MIN_STATUS..=MAX_STATUS).contains(status))
        .ok_or(PluginError::InvalidStatus(code))
}

fn validated_body(body: Option<String>, diagnostics: &mut ErrorAccumulator) -> Option<String> {
    let body = body?;
    match serde_json::from_str::<serde::de::IgnoredAny>(&body) {
        Ok(_) => Some(body),
        Err(e) => {
            diagnostics.push(format!("worker body discarded, not valid JSON: {e}"));
            None
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_code_accepts_http_range() {
        assert_eq!(status_from_code(200).unwrap(), 200);
        assert_eq!(status_from_code(100).unwrap(), 100);
        assert_eq!(status_from_code(999).unwrap(), 999);
    }

    #[test]
    fn test_status_from_code_rejects_out_of_range() {
        for code in [0, 42, 99, 1000, 70_000, u32::MAX] {
            assert!(
                matches!(status_from_code(code), Err(PluginError::InvalidStatus(c)) if c == code),
                "{code}"
            );
        }
    }

    #[test]
    fn test_validated_body_keeps_json() {
        let mut diagnostics = ErrorAccumulator::new();
        let body = validated_body(Some(r#"{"items":[1,2]}"#.to_owned()), &mut diagnostics);
        assert_eq!(body.as_deref(), Some(r#"{"items":[1,2]}"#));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_validated_body_drops_non_json() {
        let mut diagnostics = ErrorAccumulator::new();
        let body = validated_body(Some("plain text".to_owned()), &mut diagnostics);
        assert!(body.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
