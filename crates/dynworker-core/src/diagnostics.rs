//! Per-invocation diagnostics.
//!
//! Diagnostics are human-readable strings describing why an invocation fell
//! back to an error response. They never reach the response body; they are
//! handed to a [`DiagnosticSink`] once, when the invocation's
//! [`DiagnosticScope`] is dropped.

use std::ops::{Deref, DerefMut};

use tracing::error;

/// Ordered, append-only list of diagnostics for one invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorAccumulator {
    entries: Vec<String>,
}

impl ErrorAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    /// Append every diagnostic from `other`, preserving order.
    pub fn extend(&mut self, other: ErrorAccumulator) {
        self.entries.extend(other.entries);
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over recorded diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Consume the accumulator, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

/// Destination for flushed diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Receive every diagnostic recorded during one invocation.
    ///
    /// Called exactly once per invocation, possibly with an empty list.
    fn flush(&self, diagnostics: Vec<String>);
}

/// Sink that emits each diagnostic as a `tracing` error event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn flush(&self, diagnostics: Vec<String>) {
        for diagnostic in diagnostics {
            error!(diagnostic = %diagnostic, "invocation diagnostic");
        }
    }
}

/// Guard owning an invocation's [`ErrorAccumulator`].
///
/// Flushes to the sink when dropped, on every exit path including unwinding.
pub struct DiagnosticScope<'a> {
    accumulator: ErrorAccumulator,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> DiagnosticScope<'a> {
    /// Open a scope that flushes into `sink`.
    #[must_use]
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            accumulator: ErrorAccumulator::new(),
            sink,
        }
    }
}

impl Deref for DiagnosticScope<'_> {
    type Target = ErrorAccumulator;

    fn deref(&self) -> &Self::Target {
        &self.accumulator
    }
}

impl DerefMut for DiagnosticScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.accumulator
    }
}

impl Drop for DiagnosticScope<'_> {
    fn drop(&mut self) {
        let entries = std::mem::take(&mut self.accumulator).into_entries();
        self.sink.flush(entries);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Collect {
        flushes: Mutex<Vec<Vec<String>>>,
    }

    impl DiagnosticSink for Collect {
        fn flush(&self, diagnostics: Vec<String>) {
            self.flushes.lock().unwrap().push(diagnostics);
        }
    }

    #[test]
    fn test_accumulator_preserves_order() {
        let mut acc = ErrorAccumulator::new();
        acc.push("first");
        let mut other = ErrorAccumulator::new();
        other.push("second");
        other.push("third");
        acc.extend(other);

        assert_eq!(acc.iter().collect::<Vec<_>>(), ["first", "second", "third"]);
    }

    #[test]
    fn test_scope_flushes_once_on_drop() {
        let sink = Collect::default();
        {
            let mut scope = DiagnosticScope::new(&sink);
            scope.push("module missing");
            scope.push("falling back");
        }

        let flushes = sink.flushes.lock().unwrap();
        assert_eq!(flushes.len(), 1);
        assert_eq!(flushes[0], vec!["module missing", "falling back"]);
    }

    #[test]
    fn test_scope_flushes_empty_list() {
        let sink = Collect::default();
        drop(DiagnosticScope::new(&sink));

        let flushes = sink.flushes.lock().unwrap();
        assert_eq!(flushes.len(), 1);
        assert!(flushes[0].is_empty());
    }

    #[test]
    fn test_scope_flushes_while_unwinding() {
        let sink = Collect::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut scope = DiagnosticScope::new(&sink);
            scope.push("before panic");
            panic!("boom");
        }));

        assert!(result.is_err());
        let flushes = sink.flushes.lock().unwrap();
        assert_eq!(flushes.len(), 1);
        assert_eq!(flushes[0], vec!["before panic"]);
    }
}
