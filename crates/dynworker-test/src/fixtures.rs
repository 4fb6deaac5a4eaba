//! Filesystem fixtures.

use std::path::PathBuf;

use tempfile::TempDir;

/// File name used for placeholder modules.
pub const MODULE_FILE_NAME: &str = "libWorkerPlugin.so";

/// Create a placeholder module file that the locator will accept.
///
/// The file is not a shared object; pair it with a `StubModule`. Keep the
/// returned directory alive for as long as the path is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn module_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(MODULE_FILE_NAME);
    std::fs::write(&path, b"placeholder module").expect("write placeholder module");
    (dir, path)
}

/// A path inside a fresh temporary directory where no module exists.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn missing_module_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(MODULE_FILE_NAME);
    (dir, path)
}

/// A representative request event.
#[must_use]
pub fn test_event() -> String {
    serde_json::json!({
        "version": "2.0",
        "rawPath": "/items",
        "requestContext": { "http": { "method": "GET" } },
        "body": null,
    })
    .to_string()
}
