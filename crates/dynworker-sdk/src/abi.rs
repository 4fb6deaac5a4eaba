//! Raw pointer hand-off between the module entry point and the host.
//!
//! [`into_raw_builder`] and [`from_raw_builder`] are the only place where a
//! builder is turned into an opaque pointer and back. A `Box<dyn
//! WorkerBuilder>` is a fat pointer, so it is boxed once more to get a thin
//! pointer that fits through a C function signature.

#![allow(unsafe_code)]

use core::ffi::c_void;
use core::ptr::NonNull;

use crate::WorkerBuilder;

/// Name of the symbol every worker module must export.
pub const ENTRY_SYMBOL: &str = "createPlugin";

/// Signature of the exported entry point: a zero-argument factory returning
/// an owning pointer to a builder.
pub type EntryFn = unsafe extern "C" fn() -> *mut c_void;

/// Leak a builder into an opaque owning pointer.
///
/// Ownership passes to whoever calls [`from_raw_builder`] on the result.
#[must_use]
pub fn into_raw_builder(builder: Box<dyn WorkerBuilder>) -> *mut c_void {
    Box::into_raw(Box::new(builder)).cast::<c_void>()
}

/// Reclaim ownership of a builder produced by [`into_raw_builder`].
///
/// # Safety
///
/// `raw` must come from [`into_raw_builder`], compiled with the same
/// toolchain and crate version as the caller, and must not have been
/// reclaimed before. Each pointer may be passed here at most once.
#[must_use]
pub unsafe fn from_raw_builder(raw: NonNull<c_void>) -> Box<dyn WorkerBuilder> {
    // SAFETY: the caller guarantees `raw` is a leaked `Box<Box<dyn WorkerBuilder>>`.
    let outer = unsafe { Box::from_raw(raw.as_ptr().cast::<Box<dyn WorkerBuilder>>()) };
    *outer
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Worker;

    struct Fixed(u32);

    impl Worker for Fixed {
        fn run(&mut self, _event: &str) -> u32 {
            self.0
        }
    }

    struct CountingBuilder {
        drops: Arc<AtomicUsize>,
    }

    impl Drop for CountingBuilder {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl WorkerBuilder for CountingBuilder {
        fn build(self: Box<Self>) -> Box<dyn Worker> {
            Box::new(Fixed(201))
        }
    }

    #[test]
    fn test_builder_survives_hand_off() {
        let drops = Arc::new(AtomicUsize::new(0));
        let raw = into_raw_builder(Box::new(CountingBuilder {
            drops: Arc::clone(&drops),
        }));
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        let builder = unsafe { from_raw_builder(NonNull::new(raw).unwrap()) };
        let mut worker = builder.build();

        assert_eq!(worker.run("{}"), 201);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_body_is_absent() {
        let worker = Fixed(200);
        assert!(worker.body().is_none());
    }

    #[test]
    fn test_entry_symbol_name() {
        assert_eq!(ENTRY_SYMBOL, "createPlugin");
    }
}
