//! In-process worker entry points.
//!
//! Each function has the `EntryFn` signature and hands out a builder exactly
//! like a real module's `createPlugin` would, so the host side of the ABI is
//! exercised without a shared object.

use std::ffi::c_void;
use std::ptr;

use dynworker_sdk::{Worker, WorkerBuilder, export_builder, into_raw_builder};

/// Body returned by [`ok`].
pub const OK_BODY: &str = r#"{"ok":true}"#;

/// Status code returned for an unrecognised status by [`invalid_status`].
pub const INVALID_STATUS: u32 = 42;

struct FixedBuilder {
    code: u32,
    body: Option<&'static str>,
}

impl WorkerBuilder for FixedBuilder {
    fn build(self: Box<Self>) -> Box<dyn Worker> {
        Box::new(FixedWorker {
            code: self.code,
            body: self.body,
        })
    }
}

struct FixedWorker {
    code: u32,
    body: Option<&'static str>,
}

impl Worker for FixedWorker {
    fn run(&mut self, _event: &str) -> u32 {
        self.code
    }

    fn body(&self) -> Option<String> {
        self.body.map(str::to_owned)
    }
}

struct EchoBuilder;

impl WorkerBuilder for EchoBuilder {
    fn build(self: Box<Self>) -> Box<dyn Worker> {
        Box::new(EchoWorker { event: None })
    }
}

struct EchoWorker {
    event: Option<String>,
}

impl Worker for EchoWorker {
    fn run(&mut self, event: &str) -> u32 {
        self.event = Some(event.to_owned());
        200
    }

    fn body(&self) -> Option<String> {
        self.event
            .as_ref()
            .map(|event| serde_json::json!({ "event": event }).to_string())
    }
}

#[derive(Clone, Copy)]
enum PanicAt {
    Build,
    Run,
}

struct PanickingBuilder(PanicAt);

impl WorkerBuilder for PanickingBuilder {
    fn build(self: Box<Self>) -> Box<dyn Worker> {
        match self.0 {
            PanicAt::Build => panic!("builder exploded"),
            PanicAt::Run => Box::new(PanickingWorker),
        }
    }
}

struct PanickingWorker;

impl Worker for PanickingWorker {
    fn run(&mut self, _event: &str) -> u32 {
        panic!("worker exploded")
    }
}

fn fixed(code: u32, body: Option<&'static str>) -> *mut c_void {
    into_raw_builder(Box::new(FixedBuilder { code, body }))
}

/// Worker that succeeds with `200` and [`OK_BODY`].
pub extern "C" fn ok() -> *mut c_void {
    fixed(200, Some(OK_BODY))
}

/// Worker that returns `200` without a body.
pub extern "C" fn no_body() -> *mut c_void {
    fixed(200, None)
}

/// Worker that returns `403`.
pub extern "C" fn forbidden() -> *mut c_void {
    fixed(403, None)
}

/// Worker that returns [`INVALID_STATUS`].
pub extern "C" fn invalid_status() -> *mut c_void {
    fixed(INVALID_STATUS, None)
}

/// Worker that returns `200` with a body that is not JSON.
pub extern "C" fn non_json_body() -> *mut c_void {
    fixed(200, Some("plain text, not json"))
}

/// Worker that returns `200` and echoes the event inside its body.
pub extern "C" fn echo() -> *mut c_void {
    into_raw_builder(Box::new(EchoBuilder))
}

/// Entry point that returns a null builder.
pub extern "C" fn null() -> *mut c_void {
    ptr::null_mut()
}

/// Builder that panics while building.
pub extern "C" fn panicking_build() -> *mut c_void {
    into_raw_builder(Box::new(PanickingBuilder(PanicAt::Build)))
}

/// Worker that panics while running.
pub extern "C" fn panicking_run() -> *mut c_void {
    into_raw_builder(Box::new(PanickingBuilder(PanicAt::Run)))
}

/// Worker that panics while running, behind the guard `export_worker!` adds.
pub extern "C" fn guarded_panicking_run() -> *mut c_void {
    export_builder(|| Box::new(PanickingBuilder(PanicAt::Run)))
}

/// Guarded builder that panics while building.
pub extern "C" fn guarded_panicking_build() -> *mut c_void {
    export_builder(|| Box::new(PanickingBuilder(PanicAt::Build)))
}

/// Guarded factory that panics before producing a builder.
pub extern "C" fn guarded_panicking_factory() -> *mut c_void {
    export_builder(|| panic!("factory exploded"))
}
