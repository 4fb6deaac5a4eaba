//! Mock implementations of the dispatcher's capabilities.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dynworker_core::DiagnosticSink;
use dynworker_plugins::{NativeModule, PluginError, PluginResult};
use dynworker_sdk::EntryFn;

/// Open/close bookkeeping shared between a [`StubModule`] and the test.
#[derive(Debug, Default)]
pub struct ModuleCounters {
    opens: AtomicUsize,
    closes: AtomicUsize,
    lookups: Mutex<Vec<String>>,
}

impl ModuleCounters {
    /// Number of successful opens.
    #[must_use]
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Number of close attempts, including failed ones.
    #[must_use]
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Whether every open was followed by exactly one close.
    #[must_use]
    pub fn balanced(&self) -> bool {
        self.opens() == self.closes()
    }

    /// Symbols looked up, in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

/// How a [`StubModule`] fails to open.
#[derive(Debug, Clone)]
enum OpenFailure {
    Silent,
    WithMessage(String),
}

/// Handle to a module opened by [`StubModule`].
#[derive(Debug)]
pub struct StubHandle {
    entry: Option<EntryFn>,
}

/// A [`NativeModule`] that never touches the dynamic linker.
///
/// The "module" exports a single entry point under whatever symbol the loader
/// asks for, unless configured to be missing. Every open and close is counted.
#[derive(Debug, Clone)]
pub struct StubModule {
    entry: Option<EntryFn>,
    exported_symbol: Option<String>,
    open_failure: Option<OpenFailure>,
    close_failure: Option<String>,
    counters: Arc<ModuleCounters>,
}

impl StubModule {
    /// Create a module exporting `entry`.
    #[must_use]
    pub fn new(entry: EntryFn) -> Self {
        Self {
            entry: Some(entry),
            exported_symbol: None,
            open_failure: None,
            close_failure: None,
            counters: Arc::new(ModuleCounters::default()),
        }
    }

    /// Create a module that exports nothing.
    #[must_use]
    pub fn without_entry() -> Self {
        Self {
            entry: None,
            ..Self::new(crate::entries::ok)
        }
    }

    /// Only export the entry point under `symbol`.
    #[must_use]
    pub fn exporting(mut self, symbol: impl Into<String>) -> Self {
        self.exported_symbol = Some(symbol.into());
        self
    }

    /// Fail every open without a loader diagnostic.
    #[must_use]
    pub fn failing_open(mut self) -> Self {
        self.open_failure = Some(OpenFailure::Silent);
        self
    }

    /// Fail every open with a loader diagnostic.
    #[must_use]
    pub fn failing_open_with(mut self, message: impl Into<String>) -> Self {
        self.open_failure = Some(OpenFailure::WithMessage(message.into()));
        self
    }

    /// Fail every close with a loader diagnostic.
    #[must_use]
    pub fn failing_close_with(mut self, message: impl Into<String>) -> Self {
        self.close_failure = Some(message.into());
        self
    }

    /// Counters shared with every clone of this module.
    #[must_use]
    pub fn counters(&self) -> Arc<ModuleCounters> {
        Arc::clone(&self.counters)
    }
}

impl NativeModule for StubModule {
    type Handle = StubHandle;

    fn open(&self, path: &Path) -> PluginResult<StubHandle> {
        match &self.open_failure {
            Some(OpenFailure::Silent) => Err(PluginError::LibraryOpen {
                path: path.to_path_buf(),
            }),
            Some(OpenFailure::WithMessage(message)) => Err(PluginError::LibraryOpenWithMessage {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            None => {
                self.counters.opens.fetch_add(1, Ordering::SeqCst);
                Ok(StubHandle { entry: self.entry })
            },
        }
    }

    fn resolve_entry(
        &self,
        handle: &StubHandle,
        path: &Path,
        symbol: &str,
    ) -> PluginResult<EntryFn> {
        if let Ok(mut guard) = self.counters.lookups.lock() {
            guard.push(symbol.to_owned());
        }
        let exported = self
            .exported_symbol
            .as_deref()
            .is_none_or(|exported| exported == symbol);
        handle
            .entry
            .filter(|_| exported)
            .ok_or_else(|| PluginError::SymbolLoad {
                symbol: symbol.to_owned(),
                path: path.to_path_buf(),
            })
    }

    fn close(&self, _handle: StubHandle, path: &Path) -> PluginResult<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        match &self.close_failure {
            Some(message) => Err(PluginError::LibraryClose {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// A [`DiagnosticSink`] that records every flush.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    flushes: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every flush, in order.
    #[must_use]
    pub fn flushes(&self) -> Vec<Vec<String>> {
        self.flushes.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of flushes so far.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flushes.lock().map(|g| g.len()).unwrap_or_default()
    }

    /// All flushed diagnostics, flattened.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<String> {
        self.flushes().into_iter().flatten().collect()
    }

    /// Whether any flushed diagnostic contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.diagnostics().iter().any(|d| d.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn flush(&self, diagnostics: Vec<String>) {
        if let Ok(mut guard) = self.flushes.lock() {
            guard.push(diagnostics);
        }
    }
}
