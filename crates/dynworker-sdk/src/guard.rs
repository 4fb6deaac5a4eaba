//! Panic containment on the module side of the boundary.
//!
//! A module links its own copy of `std`, so a panic that unwinds out of it
//! reaches the host as a foreign exception and cannot be caught there. The
//! adapters here catch panics inside the module and report them through the
//! ABI instead: a panicking factory returns null, and a panicking worker
//! returns [`PANICKED_CODE`].

use core::ffi::c_void;
use core::ptr;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::abi::into_raw_builder;
use crate::{Worker, WorkerBuilder};

/// Code a guarded worker returns after its `build` or `run` panicked.
///
/// Outside every valid status range; the host maps it to a worker panic.
pub const PANICKED_CODE: u32 = u32::MAX;

/// Run a builder factory behind [`GuardedBuilder`] and leak the result.
///
/// Returns null if `make` panics. Used by [`export_worker!`](crate::export_worker).
#[doc(hidden)]
#[must_use]
pub fn export_builder<F>(make: F) -> *mut c_void
where
    F: FnOnce() -> Box<dyn WorkerBuilder>,
{
    catch_unwind(AssertUnwindSafe(|| {
        into_raw_builder(Box::new(GuardedBuilder::new(make())))
    }))
    .unwrap_or(ptr::null_mut())
}

/// A [`WorkerBuilder`] that contains panics from the builder and worker it wraps.
pub struct GuardedBuilder {
    inner: Box<dyn WorkerBuilder>,
}

impl GuardedBuilder {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: Box<dyn WorkerBuilder>) -> Self {
        Self { inner }
    }
}

impl WorkerBuilder for GuardedBuilder {
    fn build(self: Box<Self>) -> Box<dyn Worker> {
        let inner = self.inner;
        let worker = catch_unwind(AssertUnwindSafe(move || inner.build())).ok();
        Box::new(GuardedWorker { inner: worker })
    }
}

/// Worker side of [`GuardedBuilder`]. `None` once the inner worker panicked.
struct GuardedWorker {
    inner: Option<Box<dyn Worker>>,
}

impl GuardedWorker {
    fn discard(&mut self) {
        if let Some(worker) = self.inner.take() {
            let _ = catch_unwind(AssertUnwindSafe(move || drop(worker)));
        }
    }
}

impl Worker for GuardedWorker {
    fn run(&mut self, event: &str) -> u32 {
        let Some(worker) = self.inner.as_mut() else {
            return PANICKED_CODE;
        };
        match catch_unwind(AssertUnwindSafe(|| worker.run(event))) {
            Ok(code) => code,
            Err(_) => {
                self.discard();
                PANICKED_CODE
            },
        }
    }

    fn body(&self) -> Option<String> {
        let worker = self.inner.as_ref()?;
        catch_unwind(AssertUnwindSafe(|| worker.body()))
            .ok()
            .flatten()
    }
}

impl Drop for GuardedWorker {
    fn drop(&mut self) {
        self.discard();
    }
}

#[cfg(test)]
mod tests {
    use core::ptr::NonNull;

    use super::*;
    use crate::abi::from_raw_builder;

    struct Fixed {
        code: u32,
        body: Option<&'static str>,
    }

    impl Worker for Fixed {
        fn run(&mut self, _event: &str) -> u32 {
            self.code
        }

        fn body(&self) -> Option<String> {
            self.body.map(str::to_owned)
        }
    }

    struct Explodes;

    impl Worker for Explodes {
        fn run(&mut self, _event: &str) -> u32 {
            panic!("run exploded")
        }

        fn body(&self) -> Option<String> {
            panic!("body exploded")
        }
    }

    impl Drop for Explodes {
        fn drop(&mut self) {
            if !std::thread::panicking() {
                panic!("drop exploded");
            }
        }
    }

    enum Behaviour {
        Fixed,
        PanicInBuild,
        PanicInRun,
    }

    struct TestBuilder(Behaviour);

    impl WorkerBuilder for TestBuilder {
        fn build(self: Box<Self>) -> Box<dyn Worker> {
            match self.0 {
                Behaviour::Fixed => Box::new(Fixed {
                    code: 201,
                    body: Some(r#"{"id":1}"#),
                }),
                Behaviour::PanicInBuild => panic!("build exploded"),
                Behaviour::PanicInRun => Box::new(Explodes),
            }
        }
    }

    fn guarded(behaviour: Behaviour) -> Box<dyn Worker> {
        Box::new(GuardedBuilder::new(Box::new(TestBuilder(behaviour)))).build()
    }

    #[test]
    fn test_guarded_worker_passes_results_through() {
        let mut worker = guarded(Behaviour::Fixed);
        assert_eq!(worker.run("{}"), 201);
        assert_eq!(worker.body().as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn test_panic_in_build_is_reported_as_code() {
        let mut worker = guarded(Behaviour::PanicInBuild);
        assert_eq!(worker.run("{}"), PANICKED_CODE);
        assert!(worker.body().is_none());
    }

    #[test]
    fn test_panic_in_run_and_drop_is_contained() {
        let mut worker = guarded(Behaviour::PanicInRun);
        assert_eq!(worker.run("{}"), PANICKED_CODE);
        assert!(worker.body().is_none());
        drop(worker);
    }

    #[test]
    fn test_panic_in_body_yields_no_body() {
        let worker = GuardedWorker {
            inner: Some(Box::new(Fixed { code: 200, body: None })),
        };
        assert!(worker.body().is_none());

        let mut worker = GuardedWorker {
            inner: Some(Box::new(Explodes)),
        };
        assert!(worker.body().is_none());
        // Explodes panics on drop; discarding it must stay contained.
        worker.discard();
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_export_builder_hands_off_guarded_builder() {
        let raw = export_builder(|| Box::new(TestBuilder(Behaviour::Fixed)));
        let builder = unsafe { from_raw_builder(NonNull::new(raw).unwrap()) };
        assert_eq!(builder.build().run("{}"), 201);
    }

    #[test]
    fn test_export_builder_returns_null_on_panic() {
        let raw = export_builder(|| panic!("factory exploded"));
        assert!(raw.is_null());
    }

    #[test]
    fn test_panicked_code_is_not_a_status() {
        assert!(u16::try_from(PANICKED_CODE).is_err());
    }
}
