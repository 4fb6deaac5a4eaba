//! The invocation handler.
//!
//! One call to [`DispatchHandler::handle`] is one invocation:
//!
//! 1. Open a diagnostic scope and prepare the internal error fallback.
//! 2. Resolve the module on the shared filesystem.
//! 3. Load and run it against the event.
//! 4. On any failure, record a diagnostic tagged with a fresh error id and
//!    answer with the fallback.
//! 5. Flush the diagnostics once, then return.

use dynworker_config::Config;
use dynworker_core::{
    DiagnosticScope, DiagnosticSink, ErrorAccumulator, ResponseEnvelope, TracingSink, catalog,
};
use dynworker_plugins::{LibloadingModule, ModuleLocator, NativeModule, PluginLoader};
use dynworker_telemetry::InvocationContext;
use tracing::{Instrument, info, warn};
use uuid::Uuid;

use crate::error::DispatchResult;

/// Encoded internal error envelope, returned when the real envelope cannot
/// be encoded.
pub const FALLBACK_RESPONSE_JSON: &str = r#"{"statusCode":500,"headers":null,"body":"{\"message\":{\"title\":\"Internal Error\",\"detail\":\"An internal error has occured.\",\"type\":\"DecodingException\",\"status\":\"500\"}}","isBase64Encoded":false,"cookies":null}"#;

/// Handles invocations by running the configured worker module.
///
/// Holds no per-invocation state and can serve concurrent invocations.
pub struct DispatchHandler<M: NativeModule = LibloadingModule, S: DiagnosticSink = TracingSink> {
    locator: ModuleLocator,
    loader: PluginLoader<M>,
    sink: S,
}

impl DispatchHandler {
    /// Handler for the default module path, logging diagnostics via `tracing`.
    #[must_use]
    pub fn native() -> Self {
        Self::new(ModuleLocator::default(), PluginLoader::native(), TracingSink)
    }

    /// Handler for the module and entry symbol named in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ModuleLocator::new(&config.module.path),
            PluginLoader::native().with_entry_symbol(&config.module.entry_symbol),
            TracingSink,
        )
    }
}

impl<M: NativeModule, S: DiagnosticSink> DispatchHandler<M, S> {
    /// Assemble a handler from its parts.
    #[must_use]
    pub fn new(locator: ModuleLocator, loader: PluginLoader<M>, sink: S) -> Self {
        Self {
            locator,
            loader,
            sink,
        }
    }

    /// The module locator.
    #[must_use]
    pub fn locator(&self) -> &ModuleLocator {
        &self.locator
    }

    /// The module loader.
    #[must_use]
    pub fn loader(&self) -> &PluginLoader<M> {
        &self.loader
    }

    /// The diagnostic sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle one event in a fresh invocation context.
    pub async fn handle(&self, event: &str) -> ResponseEnvelope {
        self.handle_with(&InvocationContext::new(), event).await
    }

    /// Handle one event inside `ctx`'s span.
    pub async fn handle_with(&self, ctx: &InvocationContext, event: &str) -> ResponseEnvelope {
        let mut diagnostics = DiagnosticScope::new(&self.sink);
        self.dispatch(ctx, event, &mut diagnostics)
            .instrument(ctx.span())
            .await
    }

    /// Handle one event and encode the envelope for the host.
    pub async fn handle_encoded(&self, event: &str) -> String {
        self.handle_encoded_with(&InvocationContext::new(), event)
            .await
    }

    /// Handle one event inside `ctx`'s span and encode the envelope.
    ///
    /// Falls back to [`FALLBACK_RESPONSE_JSON`] if encoding fails.
    pub async fn handle_encoded_with(&self, ctx: &InvocationContext, event: &str) -> String {
        let mut diagnostics = DiagnosticScope::new(&self.sink);
        let response = self
            .dispatch(ctx, event, &mut diagnostics)
            .instrument(ctx.span())
            .await;
        response
            .to_json(&mut diagnostics)
            .unwrap_or_else(|| FALLBACK_RESPONSE_JSON.to_owned())
    }

    async fn dispatch(
        &self,
        ctx: &InvocationContext,
        event: &str,
        diagnostics: &mut ErrorAccumulator,
    ) -> ResponseEnvelope {
        let fallback = catalog::internal_error(diagnostics);

        match self.try_dispatch(event, diagnostics).await {
            Ok(response) => {
                info!(
                    status = response.status_code,
                    elapsed_ms = ctx.elapsed_ms(),
                    "invocation completed"
                );
                response
            },
            Err(e) => {
                let error_id = Uuid::new_v4();
                warn!(%error_id, elapsed_ms = ctx.elapsed_ms(), "invocation failed");
                diagnostics.push(format!("dispatch failed [{error_id}]: {e}"));
                fallback
            },
        }
    }

    async fn try_dispatch(
        &self,
        event: &str,
        diagnostics: &mut ErrorAccumulator,
    ) -> DispatchResult<ResponseEnvelope> {
        let path = self.locator.resolve().await?;
        Ok(self.loader.load(&path, event, diagnostics).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use dynworker_core::ErrorBody;
    use dynworker_plugins::DEFAULT_MODULE_PATH;
    use dynworker_test::{
        RecordingSink, StubModule, entries, missing_module_path, module_file, test_event,
    };

    use super::*;

    fn handler(path: &Path, module: StubModule) -> DispatchHandler<StubModule, RecordingSink> {
        DispatchHandler::new(
            ModuleLocator::new(path),
            PluginLoader::new(module),
            RecordingSink::new(),
        )
    }

    fn internal_error_body() -> ErrorBody {
        let mut diagnostics = ErrorAccumulator::new();
        catalog::internal_error(&mut diagnostics)
            .error_body()
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_module_returns_internal_error() {
        let (_dir, path) = missing_module_path();
        let handler = handler(&path, StubModule::new(entries::ok));

        let response = handler.handle("{}").await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.error_body().unwrap().unwrap(), internal_error_body());
        assert_eq!(handler.sink().flush_count(), 1);
        assert!(handler.sink().contains("module not found"));
    }

    #[tokio::test]
    async fn test_missing_symbol_is_diagnosed_by_name() {
        let (_dir, path) = module_file();
        let handler = handler(&path, StubModule::without_entry());

        let response = handler.handle("{}").await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.error_body().unwrap().unwrap(), internal_error_body());
        assert!(handler.sink().contains("createPlugin"));
    }

    #[tokio::test]
    async fn test_worker_status_and_body_pass_through() {
        let (_dir, path) = module_file();
        let handler = handler(&path, StubModule::new(entries::ok));

        let response = handler.handle("{}").await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body.as_deref(), Some(entries::OK_BODY));
        assert_eq!(handler.sink().flushes(), vec![Vec::<String>::new()]);
    }

    #[tokio::test]
    async fn test_forbidden_worker() {
        let (_dir, path) = module_file();
        let handler = handler(&path, StubModule::new(entries::forbidden));

        let response = handler.handle("{}").await;

        assert_eq!(response.status_code, 403);
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn test_same_event_same_envelope() {
        let (_dir, path) = module_file();
        let handler = handler(&path, StubModule::new(entries::echo));
        let event = test_event();

        let first = handler.handle(&event).await;
        let second = handler.handle(&event).await;

        assert_eq!(first, second);
        assert_eq!(handler.sink().flush_count(), 2);
    }

    #[tokio::test]
    async fn test_loader_diagnostics_never_reach_the_body() {
        let (_dir, path) = module_file();
        let module = StubModule::new(entries::ok).failing_open_with("invalid ELF header");
        let handler = handler(&path, module);

        let response = handler.handle("{}").await;

        assert_eq!(response.status_code, 500);
        assert!(!response.body.unwrap().contains("ELF"));
        assert!(handler.sink().contains("invalid ELF header"));
    }

    #[tokio::test]
    async fn test_failures_are_tagged_with_an_error_id() {
        let (_dir, path) = module_file();
        let handler = handler(&path, StubModule::new(entries::panicking_run));

        let response = handler.handle("{}").await;

        assert_eq!(response.status_code, 500);
        let diagnostics = handler.sink().diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].starts_with("dispatch failed ["));
        assert!(diagnostics[0].contains("worker exploded"));
    }

    #[tokio::test]
    async fn test_close_failure_keeps_worker_response() {
        let (_dir, path) = module_file();
        let module = StubModule::new(entries::forbidden).failing_close_with("dlclose failed");
        let counters = module.counters();
        let handler = handler(&path, module);

        let response = handler.handle("{}").await;

        assert_eq!(response.status_code, 403);
        assert!(counters.balanced());
        assert_eq!(handler.sink().flush_count(), 1);
        assert!(handler.sink().contains("dlclose failed"));
    }

    #[tokio::test]
    async fn test_handle_with_context() {
        let (_dir, path) = module_file();
        let handler = handler(&path, StubModule::new(entries::ok));
        let ctx = InvocationContext::new().with_request_id("req-9");

        let response = handler.handle_with(&ctx, "{}").await;
        assert_eq!(response.status_code, 200);
    }

    #[tokio::test]
    async fn test_handle_encoded_flushes_once() {
        let (_dir, path) = module_file();
        let handler = handler(&path, StubModule::new(entries::ok));

        let encoded = handler.handle_encoded("{}").await;
        let decoded: ResponseEnvelope = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.status_code, 200);
        assert_eq!(decoded.body.as_deref(), Some(entries::OK_BODY));
        assert_eq!(handler.sink().flush_count(), 1);
    }

    #[test]
    fn test_fallback_json_matches_internal_error() {
        let mut diagnostics = ErrorAccumulator::new();
        let encoded = catalog::internal_error(&mut diagnostics)
            .to_json(&mut diagnostics)
            .unwrap();
        assert_eq!(encoded, FALLBACK_RESPONSE_JSON);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_native_handler_uses_defaults() {
        let handler = DispatchHandler::native();
        assert_eq!(handler.locator().path(), Path::new(DEFAULT_MODULE_PATH));
        assert_eq!(handler.loader().entry_symbol(), "createPlugin");
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.module.path = "/opt/workers/libOrders.so".into();
        config.module.entry_symbol = "makeWorker".to_owned();

        let handler = DispatchHandler::from_config(&config);
        assert_eq!(handler.locator().path(), Path::new("/opt/workers/libOrders.so"));
        assert_eq!(handler.loader().entry_symbol(), "makeWorker");
    }
}
