use std::time::Duration;

use thiserror::Error;

use crate::outcome::Rejection;

/// Everything that can stop a request body from being ingested.
///
/// Only [`IngestError::Stream`] is fatal to the request: it never produces a
/// response and never reaches a handler. Every other variant maps to a
/// [`Rejection`] through [`IngestError::rejection`].
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("body stream error: {reason}")]
    Stream { reason: String },

    #[error("malformed payload: {source}")]
    MalformedPayload {
        #[from]
        source: DecodeError,
    },

    #[error("payload exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("body not completed within {after:?}")]
    Timeout { after: Duration },
}

impl IngestError {
    pub fn stream<S: ToString>(str: S) -> Self {
        Self::Stream { reason: str.to_string() }
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge { limit }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Returns true if the underlying connection failed before the body completed
    #[inline]
    pub fn is_stream(&self) -> bool {
        matches!(self, IngestError::Stream { .. })
    }

    /// The client-visible form of this error, `None` for stream errors which
    /// must not produce any response.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            IngestError::Stream { .. } => None,
            IngestError::MalformedPayload { .. } => Some(Rejection::malformed_payload()),
            IngestError::PayloadTooLarge { .. } => Some(Rejection::payload_too_large()),
            IngestError::Timeout { .. } => Some(Rejection::body_timeout()),
        }
    }
}

/// Failure of a single body decoder.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed json: {source}")]
    MalformedJson {
        #[from]
        source: serde_json::Error,
    },

    #[error("json body must be an object, got {kind}")]
    NotAnObject { kind: &'static str },
}

impl DecodeError {
    pub fn not_an_object(value: &serde_json::Value) -> Self {
        let kind = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::NotAnObject { kind }
    }
}
