//! `dynworker invoke`: handle one event and print the envelope.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dynworker_config::Config;
use dynworker_runtime::DispatchHandler;
use dynworker_telemetry::InvocationContext;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Where the event comes from.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum EventSource {
    /// Given on the command line.
    Inline(String),
    /// Read from a file.
    File(PathBuf),
    /// Read from standard input.
    Stdin,
}

impl EventSource {
    /// Pick the source from the `--event` and `--event-file` flags.
    pub(crate) fn from_args(event: Option<String>, event_file: Option<PathBuf>) -> Self {
        match (event, event_file) {
            (Some(event), _) => Self::Inline(event),
            (None, Some(path)) => Self::File(path),
            (None, None) => Self::Stdin,
        }
    }

    /// Read the event.
    pub(crate) async fn read(self) -> Result<String> {
        match self {
            Self::Inline(event) => Ok(event),
            Self::File(path) => tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read event file {}", path.display())),
            Self::Stdin => {
                let mut event = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut event)
                    .await
                    .context("failed to read event from stdin")?;
                Ok(event)
            },
        }
    }
}

/// Run the configured module against one event and print the envelope.
pub(crate) async fn run_invoke(
    config: &Config,
    source: EventSource,
    request_id: Option<String>,
    pretty: bool,
) -> Result<()> {
    let event = source.read().await?;
    debug!(bytes = event.len(), "read event");

    let mut ctx = InvocationContext::new();
    if let Some(request_id) = request_id {
        ctx = ctx.with_request_id(request_id);
    }

    let handler = DispatchHandler::from_config(config);
    let encoded = handler.handle_encoded_with(&ctx, &event).await;

    println!("{}", render(&encoded, pretty)?);
    Ok(())
}

fn render(encoded: &str, pretty: bool) -> Result<String> {
    if !pretty {
        return Ok(encoded.to_owned());
    }
    let value: serde_json::Value =
        serde_json::from_str(encoded).context("envelope is not valid JSON")?;
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_precedence() {
        assert_eq!(
            EventSource::from_args(Some("{}".into()), None),
            EventSource::Inline("{}".into())
        );
        assert_eq!(
            EventSource::from_args(None, Some("e.json".into())),
            EventSource::File("e.json".into())
        );
        assert_eq!(EventSource::from_args(None, None), EventSource::Stdin);
    }

    #[tokio::test]
    async fn test_read_event_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, r#"{"rawPath":"/items"}"#).unwrap();

        let event = EventSource::File(path).read().await.unwrap();
        assert_eq!(event, r#"{"rawPath":"/items"}"#);
    }

    #[tokio::test]
    async fn test_missing_event_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventSource::File(dir.path().join("absent.json"))
            .read()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read event file"));
    }

    #[tokio::test]
    async fn test_invoke_with_missing_module_prints_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.module.path = dir.path().join("libWorkerPlugin.so");

        let handler = DispatchHandler::from_config(&config);
        let encoded = handler.handle_encoded("{}").await;
        let rendered = render(&encoded, true).unwrap();

        assert!(rendered.contains("\"statusCode\": 500"));
    }

    #[test]
    fn test_render_compact_is_verbatim() {
        assert_eq!(render("{\"a\":1}", false).unwrap(), "{\"a\":1}");
    }
}
