//! Per-invocation context for correlation and tracing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one handler invocation in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Unique invocation identifier.
    pub invocation_id: Uuid,
    /// Request ID supplied by the host runtime, if any.
    pub request_id: Option<String>,
    /// When the invocation started.
    pub started_at: DateTime<Utc>,
}

impl InvocationContext {
    /// Create a context for a new invocation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            request_id: None,
            started_at: Utc::now(),
        }
    }

    /// Attach the host's request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Get elapsed time since the invocation started.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        // started_at is set at creation, so now() is never earlier
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = Utc::now() - self.started_at;
        elapsed
    }

    /// Get elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// Create a tracing span carrying this context.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "invocation",
            invocation_id = %self.invocation_id,
            request_id = self.request_id.as_deref(),
        )
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_ids_are_unique() {
        let a = InvocationContext::new();
        let b = InvocationContext::new();
        assert_ne!(a.invocation_id, b.invocation_id);
        assert!(a.request_id.is_none());
    }

    #[test]
    fn test_with_request_id() {
        let ctx = InvocationContext::new().with_request_id("req-1");
        assert_eq!(ctx.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_elapsed() {
        let ctx = InvocationContext::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(ctx.elapsed_ms() >= 10);
    }

    #[test]
    fn test_serialization() {
        let ctx = InvocationContext::new().with_request_id("req-2");

        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"request_id\":\"req-2\""));

        let parsed: InvocationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ctx);
    }

    #[test]
    fn test_span_enters() {
        let ctx = InvocationContext::new();
        let _guard = ctx.span().entered();
        tracing::debug!("inside invocation span");
    }
}
