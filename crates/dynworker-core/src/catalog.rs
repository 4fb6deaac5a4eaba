//! Canned error responses.
//!
//! Every user-visible failure maps to one entry here. Entries never include
//! request-specific diagnostics such as paths or loader messages; those go to
//! the [`ErrorAccumulator`] instead.

use crate::diagnostics::ErrorAccumulator;
use crate::envelope::{ErrorKind, ErrorMessage, ResponseEnvelope};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CannedError {
    /// Both `page[before]` and `page[after]` were supplied.
    InvalidBeforeAfterPageParameter,
    /// The page cursor is not valid.
    InvalidPageParameter,
    /// A named page cursor is not valid.
    InvalidNamedPageParameter(String),
    /// The page size is not an integer.
    InvalidPageSizeParameter,
    /// The page size is larger than allowed.
    MaxPageSizeExceeded(usize),
    /// The sort parameter cannot be honoured.
    BadSortParameter,
    /// The request content type is malformed.
    BadContentType,
    /// The request body is not valid JSON or has unexpected attributes.
    BadRequestDecoding,
    /// The request URL does not match a known function.
    UnknownFunctionUrl,
    /// The function expected to serve the request is missing.
    InternalErrorFunctionMissing,
    /// Generic internal failure.
    InternalError,
    /// The system is overloaded.
    TooManyRequests,
    /// Another transaction holds the object.
    TransactionConflict,
    /// A data precondition does not hold.
    ConditionalConflict,
    /// The caller may not access the resource.
    ForbiddenAccess,
    /// The resource does not accept client generated IDs.
    ClientGeneratedId,
    /// The schema for the request was not found.
    SchemaNotFound,
}

impl CannedError {
    /// The message for this entry.
    #[must_use]
    pub fn message(&self) -> ErrorMessage {
        match self {
            Self::InvalidBeforeAfterPageParameter => ErrorMessage::new(
                "Both Before & After Page parameters present.",
                "Pagination using both page[before] and page[after] simultaneously is not supported.",
                ErrorKind::DecodingException,
                400,
            ),
            Self::InvalidPageParameter => ErrorMessage::new(
                "Page parameter invalid.",
                "The page parameter value provided is not a valid cursor.",
                ErrorKind::DecodingException,
                400,
            ),
            Self::InvalidNamedPageParameter(name) => ErrorMessage::new(
                format!("Page parameter '{name}' invalid."),
                "The value provided for page parameter name is not a valid cursor.",
                ErrorKind::DecodingException,
                400,
            ),
            Self::InvalidPageSizeParameter => ErrorMessage::new(
                "Page size value invalid.",
                "You requested a page size that is not a valid integer.",
                ErrorKind::DecodingException,
                400,
            ),
            Self::MaxPageSizeExceeded(max) => ErrorMessage::new(
                "Page size requested is too large.",
                format!("You requested a page size larger than the maximum of {max}."),
                ErrorKind::DecodingException,
                400,
            ),
            Self::BadSortParameter => ErrorMessage::new(
                "Invalid Sort Query Parameter",
                "Unable to sort with the query parameter provided. We can only sort on one (1) existing attribute and it must be indexed.",
                ErrorKind::DecodingException,
                400,
            ),
            // 415 on both the envelope and the message; older callers saw a
            // 400 message status here.
            Self::BadContentType => ErrorMessage::new(
                "Invalid Content Type",
                "The content-type of your request is malformed. Content type should be application/vnd.api+json with no media type.",
                ErrorKind::ContentTypeException,
                415,
            ),
            Self::BadRequestDecoding => ErrorMessage::new(
                "Invalid Request Format",
                "The body of your request is not valid JSON or contains unexpected attributes.",
                ErrorKind::DecodingException,
                400,
            ),
            Self::UnknownFunctionUrl => ErrorMessage::new(
                "Invalid Request Format",
                "The url of your request does not match any known function name.",
                ErrorKind::DecodingException,
                400,
            ),
            Self::InternalErrorFunctionMissing => ErrorMessage::new(
                "Internal Error",
                "An internal error has occured. The expected function could not be found.",
                ErrorKind::DecodingException,
                500,
            ),
            Self::InternalError => ErrorMessage::new(
                "Internal Error",
                "An internal error has occured.",
                ErrorKind::DecodingException,
                500,
            ),
            Self::TooManyRequests => ErrorMessage::new(
                "System Throughput Overloaded",
                "We are unable to process your request due to system load. We are allocating more resources. Try again, backing off exponentially.",
                ErrorKind::SystemThroughputException,
                429,
            ),
            Self::TransactionConflict => ErrorMessage::new(
                "Transaction Conflict",
                "We are unable to process your request due to an ongoing transaction for this object. Try again.",
                ErrorKind::TransactionConflictException,
                409,
            ),
            Self::ConditionalConflict => ErrorMessage::new(
                "Data Conflict",
                "The required condition for this request does not exist. Eg: could be the uniqueness of a data point",
                ErrorKind::ConditionalConflictException,
                409,
            ),
            Self::ForbiddenAccess => ErrorMessage::new(
                "Forbidden",
                "Your credentials do not allow you to access this resource or to perform the requested action on this resource.",
                ErrorKind::ForbiddenException,
                403,
            ),
            Self::ClientGeneratedId => ErrorMessage::new(
                "Forbidden",
                "Client Generated IDs are not allowed on this resource.",
                ErrorKind::ForbiddenException,
                403,
            ),
            Self::SchemaNotFound => ErrorMessage::new(
                "Not Found",
                "The schema for your request was not found. There is likely an error in your request url.",
                ErrorKind::InvalidValueException,
                404,
            ),
        }
    }

    /// Build the full response envelope for this entry.
    #[must_use]
    pub fn response(&self, diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
        self.message().response(diagnostics)
    }
}

/// Pagination with both `page[before]` and `page[after]`.
#[must_use]
pub fn invalid_before_after_page_parameter(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::InvalidBeforeAfterPageParameter.response(diagnostics)
}

/// Invalid page cursor.
#[must_use]
pub fn invalid_page_parameter(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::InvalidPageParameter.response(diagnostics)
}

/// Invalid cursor for the page parameter `name`.
#[must_use]
pub fn invalid_named_page_parameter(
    name: impl Into<String>,
    diagnostics: &mut ErrorAccumulator,
) -> ResponseEnvelope {
    CannedError::InvalidNamedPageParameter(name.into()).response(diagnostics)
}

/// Page size is not an integer.
#[must_use]
pub fn invalid_page_size_parameter(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::InvalidPageSizeParameter.response(diagnostics)
}

/// Page size above `max`.
#[must_use]
pub fn max_page_size_exceeded(max: usize, diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::MaxPageSizeExceeded(max).response(diagnostics)
}

/// Unsupported sort parameter.
#[must_use]
pub fn bad_sort_parameter(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::BadSortParameter.response(diagnostics)
}

/// Malformed content type.
#[must_use]
pub fn bad_content_type(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::BadContentType.response(diagnostics)
}

/// Request body could not be decoded.
#[must_use]
pub fn bad_request_decoding(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::BadRequestDecoding.response(diagnostics)
}

/// Request URL does not name a known function.
#[must_use]
pub fn unknown_function_url(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::UnknownFunctionUrl.response(diagnostics)
}

/// The function that should serve the request is missing.
#[must_use]
pub fn internal_error_function_missing(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::InternalErrorFunctionMissing.response(diagnostics)
}

/// Generic internal failure. Used as the dispatcher's fallback response.
#[must_use]
pub fn internal_error(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::InternalError.response(diagnostics)
}

/// System throughput exceeded.
#[must_use]
pub fn too_many_requests(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::TooManyRequests.response(diagnostics)
}

/// Ongoing transaction on the object.
#[must_use]
pub fn transaction_conflict(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::TransactionConflict.response(diagnostics)
}

/// Data precondition failed.
#[must_use]
pub fn conditional_conflict(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::ConditionalConflict.response(diagnostics)
}

/// Access forbidden.
#[must_use]
pub fn forbidden_access(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::ForbiddenAccess.response(diagnostics)
}

/// Client generated identifiers rejected.
#[must_use]
pub fn client_generated_id(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::ClientGeneratedId.response(diagnostics)
}

/// Schema for the request not found.
#[must_use]
pub fn schema_not_found(diagnostics: &mut ErrorAccumulator) -> ResponseEnvelope {
    CannedError::SchemaNotFound.response(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ErrorBody;

    fn every_entry() -> Vec<CannedError> {
        vec![
            CannedError::InvalidBeforeAfterPageParameter,
            CannedError::InvalidPageParameter,
            CannedError::InvalidNamedPageParameter("after".to_owned()),
            CannedError::InvalidPageSizeParameter,
            CannedError::MaxPageSizeExceeded(100),
            CannedError::BadSortParameter,
            CannedError::BadContentType,
            CannedError::BadRequestDecoding,
            CannedError::UnknownFunctionUrl,
            CannedError::InternalErrorFunctionMissing,
            CannedError::InternalError,
            CannedError::TooManyRequests,
            CannedError::TransactionConflict,
            CannedError::ConditionalConflict,
            CannedError::ForbiddenAccess,
            CannedError::ClientGeneratedId,
            CannedError::SchemaNotFound,
        ]
    }

    #[test]
    fn test_every_entry_encodes_status_as_string() {
        for entry in every_entry() {
            let mut diagnostics = ErrorAccumulator::new();
            let envelope = entry.response(&mut diagnostics);
            let message = entry.message();

            assert!(diagnostics.is_empty(), "{entry:?} recorded diagnostics");
            assert_eq!(envelope.status_code, message.status(), "{entry:?}");

            let body = envelope.body.as_deref().unwrap();
            let raw: serde_json::Value = serde_json::from_str(body).unwrap();
            assert_eq!(
                raw["message"]["status"],
                serde_json::Value::String(message.status().to_string()),
                "{entry:?}"
            );
            assert_eq!(raw["message"]["type"], message.kind().as_str(), "{entry:?}");

            let parsed = ErrorBody::from_json(body).unwrap();
            assert_eq!(parsed.message, message, "{entry:?}");
        }
    }

    #[test]
    fn test_internal_error_body() {
        let mut diagnostics = ErrorAccumulator::new();
        let envelope = internal_error(&mut diagnostics);
        let body = envelope.error_body().unwrap().unwrap();

        assert_eq!(envelope.status_code, 500);
        assert_eq!(body.message.title(), "Internal Error");
        assert_eq!(body.message.detail(), "An internal error has occured.");
        assert_eq!(body.message.kind(), ErrorKind::DecodingException);
        assert_eq!(body.message.status(), 500);
    }

    #[test]
    fn test_forbidden_body_contains_string_status() {
        let mut diagnostics = ErrorAccumulator::new();
        let envelope = forbidden_access(&mut diagnostics);
        let body = envelope.body.unwrap();

        assert!(body.contains(r#""status":"403""#));
        assert!(body.contains(r#""type":"ForbiddenException""#));
    }

    #[test]
    fn test_parameterised_entries() {
        let named = CannedError::InvalidNamedPageParameter("before".to_owned()).message();
        assert_eq!(named.title(), "Page parameter 'before' invalid.");

        let max = CannedError::MaxPageSizeExceeded(250).message();
        assert_eq!(
            max.detail(),
            "You requested a page size larger than the maximum of 250."
        );
    }

    #[test]
    fn test_content_type_uses_unsupported_media_type() {
        let mut diagnostics = ErrorAccumulator::new();
        let envelope = bad_content_type(&mut diagnostics);
        assert_eq!(envelope.status_code, 415);
        assert!(envelope.body.unwrap().contains(r#""status":"415""#));

        let message = CannedError::BadContentType.message();
        assert_eq!(message.status(), 415);
        assert_eq!(message.kind(), ErrorKind::ContentTypeException);
    }
}
