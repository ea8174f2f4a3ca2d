//! The result of running ingestion for one request.

use bytes::Bytes;
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;

use crate::DecodedBody;

/// What ingestion produced for a request. Exactly one variant per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The body was aggregated and decoded, possibly to an empty mapping
    Decoded(DecodedBody),
    /// Ingestion did not apply to this request
    Skipped,
    /// Ingestion failed and the request must be answered with this rejection
    Failed(Rejection),
}

impl ParseOutcome {
    #[inline]
    pub fn is_decoded(&self) -> bool {
        matches!(self, ParseOutcome::Decoded(_))
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        matches!(self, ParseOutcome::Skipped)
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, ParseOutcome::Failed(_))
    }

    /// Converts the outcome into the value attached to the request, or the
    /// rejection that halts it.
    ///
    /// `Ok(None)` means skipped, `Ok(Some(_))` means decoded.
    pub fn into_attachment(self) -> Result<Option<DecodedBody>, Rejection> {
        match self {
            ParseOutcome::Decoded(body) => Ok(Some(body)),
            ParseOutcome::Skipped => Ok(None),
            ParseOutcome::Failed(rejection) => Err(rejection),
        }
    }
}

/// A client error produced by ingestion.
///
/// Carries only a status and a short fixed reason; internal error details are
/// logged and never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    status: StatusCode,
    reason: &'static str,
}

impl Rejection {
    pub const fn new(status: StatusCode, reason: &'static str) -> Self {
        Self { status, reason }
    }

    pub const fn malformed_payload() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "malformed request body")
    }

    pub const fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, "payload too large")
    }

    pub const fn body_timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, "request body timeout")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }

    /// True when the body may still be partly unread, so the connection can't
    /// be reused for another request.
    pub fn closes_connection(&self) -> bool {
        matches!(self.status, StatusCode::REQUEST_TIMEOUT | StatusCode::PAYLOAD_TOO_LARGE)
    }

    /// Renders the rejection as `{"message": "<reason>"}` with its status.
    ///
    /// A rejection that [closes the connection](Self::closes_connection) also
    /// carries `connection: close`.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let body = serde_json::json!({ "message": self.reason }).to_string();
        let mut response = Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(http::header::CONTENT_TYPE, HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()));
        if self.closes_connection() {
            response.headers_mut().insert(http::header::CONNECTION, HeaderValue::from_static("close"));
        }
        response
    }
}
