//! Response envelope and structured error body.
//!
//! The wire shapes are fixed:
//!
//! ```text
//! { "statusCode": 500, "headers": null, "body": "<json>", "isBase64Encoded": false, "cookies": null }
//! { "message": { "title": "...", "detail": "...", "type": "DecodingException", "status": "500" } }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::ErrorAccumulator;
use crate::error::{EnvelopeError, EnvelopeResult};

/// Category of a user-visible error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request could not be decoded, or an internal failure occurred.
    DecodingException,
    /// The caller is not allowed to perform the action.
    ForbiddenException,
    /// A data precondition (e.g. uniqueness) does not hold.
    ConditionalConflictException,
    /// The request exceeds a size limit.
    SizeLimitException,
    /// The system is overloaded.
    SystemThroughputException,
    /// Another transaction holds the object.
    TransactionConflictException,
    /// A value in the request is not valid.
    InvalidValueException,
    /// The request content type is not accepted.
    ContentTypeException,
}

impl ErrorKind {
    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DecodingException => "DecodingException",
            Self::ForbiddenException => "ForbiddenException",
            Self::ConditionalConflictException => "ConditionalConflictException",
            Self::SizeLimitException => "SizeLimitException",
            Self::SystemThroughputException => "SystemThroughputException",
            Self::TransactionConflictException => "TransactionConflictException",
            Self::InvalidValueException => "InvalidValueException",
            Self::ContentTypeException => "ContentTypeException",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-visible error message.
///
/// Instances come from the [`catalog`](crate::catalog); `kind` and `status`
/// are always pinned together there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireMessage", into = "WireMessage")]
pub struct ErrorMessage {
    title: String,
    detail: String,
    kind: ErrorKind,
    status: u16,
}

impl ErrorMessage {
    pub(crate) fn new(
        title: impl Into<String>,
        detail: impl Into<String>,
        kind: ErrorKind,
        status: u16,
    ) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            kind,
            status,
        }
    }

    /// Short human-readable summary.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Longer explanation shown to the caller.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP-style status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Wrap this message in a response envelope carrying the same status.
    ///
    /// If the body cannot be encoded the envelope has no body and the failure
    /// is appended to `diagnostics`.
    #[must_use]
    pub fn response(&self, diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
        let body = ErrorBody {
            message: self.clone(),
        };
        ResponseEnvelope {
            body: encode_body(&body, diagnostics),
            ..ResponseEnvelope::new(self.status)
        }
    }
}

/// Serialized form of [`ErrorMessage`]: `kind` renamed to `type`, status as a string.
#[derive(Serialize, Deserialize)]
struct WireMessage {
    title: String,
    detail: String,
    #[serde(rename = "type")]
    kind: ErrorKind,
    status: String,
}

impl From<ErrorMessage> for WireMessage {
    fn from(message: ErrorMessage) -> Self {
        Self {
            title: message.title,
            detail: message.detail,
            kind: message.kind,
            status: message.status.to_string(),
        }
    }
}

impl TryFrom<WireMessage> for ErrorMessage {
    type Error = EnvelopeError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        let status = wire
            .status
            .parse::<u16>()
            .map_err(|_| EnvelopeError::InvalidStatus(wire.status.clone()))?;
        Ok(Self {
            title: wire.title,
            detail: wire.detail,
            kind: wire.kind,
            status,
        })
    }
}

/// Top-level error body: `{ "message": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The wrapped message.
    pub message: ErrorMessage,
}

impl ErrorBody {
    /// Parse an error body from a response body string.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvelopeError`] if the string is not a valid error body.
    pub fn from_json(body: &str) -> EnvelopeResult<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// The response handed back to the host runtime for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// HTTP-style status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: Option<BTreeMap<String, String>>,
    /// JSON response body. Always valid JSON when present.
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    pub is_base64_encoded: bool,
    /// Cookies to set.
    pub cookies: Option<Vec<String>>,
}

impl ResponseEnvelope {
    /// Create an envelope with the given status and no body.
    #[must_use]
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: None,
            body: None,
            is_base64_encoded: false,
            cookies: None,
        }
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Parse the body as an [`ErrorBody`], if there is one.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvelopeError`] if the body is present but is not an error body.
    pub fn error_body(&self) -> EnvelopeResult<Option<ErrorBody>> {
        self.body.as_deref().map(ErrorBody::from_json).transpose()
    }

    /// Serialize the whole envelope for the host runtime.
    ///
    /// Returns `None` and records a diagnostic if encoding fails.
    #[must_use]
    pub fn to_json(&self, diagnostics: &mut ErrorAccumulator) -> Option<String> {
        encode_body(self, diagnostics)
    }
}

/// Encode `value` as JSON, recording a diagnostic instead of failing.
pub fn encode_body<T>(value: &T, diagnostics: &mut ErrorAccumulator) -> Option<String>
where
    T: Serialize + fmt::Debug + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            diagnostics.push(format!(
                "an error occurred encoding the response body: {e}: {value:?}"
            ));
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::Serializer;

    use super::*;

    #[test]
    fn test_error_message_wire_shape() {
        let message = ErrorMessage::new("Forbidden", "nope", ErrorKind::ForbiddenException, 403);
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Forbidden","detail":"nope","type":"ForbiddenException","status":"403"}"#
        );
    }

    #[test]
    fn test_error_message_rejects_non_numeric_status() {
        let json = r#"{"title":"t","detail":"d","type":"DecodingException","status":"abc"}"#;
        let parsed: Result<ErrorMessage, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_envelope_serializes_nulls() {
        let envelope = ResponseEnvelope::new(204);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["statusCode"], 204);
        assert!(json["headers"].is_null());
        assert!(json["body"].is_null());
        assert_eq!(json["isBase64Encoded"], false);
        assert!(json["cookies"].is_null());
    }

    #[test]
    fn test_response_pins_status_and_body() {
        let mut diagnostics = ErrorAccumulator::new();
        let message = ErrorMessage::new("Not Found", "gone", ErrorKind::InvalidValueException, 404);
        let envelope = message.response(&mut diagnostics);

        assert_eq!(envelope.status_code, 404);
        assert!(diagnostics.is_empty());
        let body = envelope.error_body().unwrap().unwrap();
        assert_eq!(body.message, message);
    }

    #[derive(Debug)]
    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refusing to encode"))
        }
    }

    #[test]
    fn test_encode_failure_is_recorded() {
        let mut diagnostics = ErrorAccumulator::new();
        let body = encode_body(&Unencodable, &mut diagnostics);

        assert!(body.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.iter().next().unwrap().contains("refusing to encode"));
    }

    #[test]
    fn test_envelope_round_trips_through_host_json() {
        let mut diagnostics = ErrorAccumulator::new();
        let envelope = ResponseEnvelope::new(200).with_body(r#"{"ok":true}"#);
        let json = envelope.to_json(&mut diagnostics).unwrap();
        let parsed: ResponseEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, envelope);
    }
}
