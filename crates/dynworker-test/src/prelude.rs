//! Convenient re-exports for tests.
//!
//! ```rust,ignore
//! use dynworker_test::prelude::*;
//! ```

pub use crate::entries;
pub use crate::fixtures::{missing_module_path, module_file, test_event};
pub use crate::mocks::{ModuleCounters, RecordingSink, StubHandle, StubModule};
