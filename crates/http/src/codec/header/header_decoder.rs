//! Parsing of the request line and header fields.
//!
//! Parsing is done by `httparse` over the read buffer. Header values are not
//! copied: each value is a slice of the frozen head bytes. The framing of the
//! payload that follows is derived from `content-length` and
//! `transfer-encoding` only, independent of the method.
//!
//! Limits: at most 64 header fields and 8KiB for the whole head.

use std::ops::Range;

use bytes::BytesMut;
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Uri, Version};
use httparse::Status;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, RequestHeader};

const MAX_HEADER_NUM: usize = 64;

const MAX_HEADER_BYTES: usize = 8 * 1024;

#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = (RequestHeader, PayloadSize);
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let head_len = match req.parse(&src[..]) {
            Ok(Status::Complete(head_len)) => head_len,
            Ok(Status::Partial) => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::head_too_large(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
            Err(httparse::Error::TooManyHeaders) => return Err(ParseError::too_many_headers(MAX_HEADER_NUM)),
            Err(e) => return Err(ParseError::invalid_header(e)),
        };
        ensure!(head_len <= MAX_HEADER_BYTES, ParseError::head_too_large(head_len, MAX_HEADER_BYTES));

        let version = match req.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            _ => return Err(ParseError::invalid_request_line("unsupported http version")),
        };
        let method = req
            .method
            .and_then(|method| Method::from_bytes(method.as_bytes()).ok())
            .ok_or_else(|| ParseError::invalid_request_line("invalid method"))?;
        let uri = req
            .path
            .and_then(|path| path.parse::<Uri>().ok())
            .ok_or_else(|| ParseError::invalid_request_line("invalid uri"))?;

        let spans: Vec<HeaderSpan> = req.headers.iter().map(|header| HeaderSpan::locate(&src[..], header)).collect();
        let head_bytes = src.split_to(head_len).freeze();

        let mut header_map = HeaderMap::with_capacity(spans.len());
        for span in spans {
            let name = HeaderName::from_bytes(&head_bytes[span.name]).map_err(ParseError::invalid_header)?;
            let value = HeaderValue::from_maybe_shared(head_bytes.slice(span.value)).map_err(ParseError::invalid_header)?;
            header_map.append(name, value);
        }

        let mut request = Request::new(());
        *request.method_mut() = method;
        *request.uri_mut() = uri;
        *request.version_mut() = version;
        *request.headers_mut() = header_map;

        let payload_size = parse_payload(request.headers())?;
        trace!(head_len, ?payload_size, "parsed request head");

        Ok(Some((RequestHeader::from(request), payload_size)))
    }
}

/// Where a header's name and value sit inside the head bytes.
struct HeaderSpan {
    name: Range<usize>,
    value: Range<usize>,
}

impl HeaderSpan {
    fn locate(buf: &[u8], header: &httparse::Header<'_>) -> Self {
        let base = buf.as_ptr() as usize;
        let name_start = header.name.as_ptr() as usize - base;
        let value_start = header.value.as_ptr() as usize - base;
        Self {
            name: name_start..name_start + header.name.len(),
            value: value_start..value_start + header.value.len(),
        }
    }
}

/// Picks the payload framing, refusing ambiguous combinations.
fn parse_payload(headers: &HeaderMap) -> Result<PayloadSize, ParseError> {
    let transfer_encoding = headers.get(TRANSFER_ENCODING);
    let has_content_length = headers.contains_key(CONTENT_LENGTH);

    match (transfer_encoding, has_content_length) {
        (None, false) => Ok(PayloadSize::Empty),
        (Some(value), false) if is_chunked(value) => Ok(PayloadSize::Chunked),
        (Some(_), false) => Err(ParseError::invalid_header("transfer-encoding must end with chunked")),
        (None, true) => content_length(headers).map(PayloadSize::Length),
        (Some(_), true) => Err(ParseError::invalid_content_length("transfer-encoding and content-length both present")),
    }
}

/// Every `content-length` field must carry the same decimal value.
fn content_length(headers: &HeaderMap) -> Result<u64, ParseError> {
    let mut length = None;
    for value in headers.get_all(CONTENT_LENGTH) {
        let text = value.to_str().map_err(ParseError::invalid_content_length)?.trim();
        ensure!(
            !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()),
            ParseError::invalid_content_length(format!("value {text} is not a length"))
        );
        let parsed = text.parse::<u64>().map_err(ParseError::invalid_content_length)?;

        match length {
            Some(previous) if previous != parsed => {
                return Err(ParseError::invalid_content_length("conflicting content-length values"));
            }
            _ => length = Some(parsed),
        }
    }

    length.ok_or_else(|| ParseError::invalid_content_length("missing value"))
}

fn is_chunked(value: &HeaderValue) -> bool {
    value
        .as_bytes()
        .rsplit(|b| *b == b',')
        .next()
        .is_some_and(|last| last.trim_ascii().eq_ignore_ascii_case(b"chunked"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn decode(text: &str) -> Result<Option<(RequestHeader, PayloadSize)>, ParseError> {
        HeaderDecoder.decode(&mut BytesMut::from(text.replace('\n', "\r\n").as_str()))
    }

    #[test]
    fn chunked_is_last_coding() {
        assert!(is_chunked(&HeaderValue::from_static("chunked")));
        assert!(is_chunked(&HeaderValue::from_static("gzip, Chunked")));
        assert!(!is_chunked(&HeaderValue::from_static("chunked, gzip")));
        assert!(!is_chunked(&HeaderValue::from_static("gzip")));
    }

    #[test]
    fn get_from_curl() {
        let text = indoc! {r"
        GET /add-employee?department=ops HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/8.4.0
        Accept: */*

        "};

        let (header, payload_size) = decode(text).unwrap().unwrap();

        assert_eq!(payload_size, PayloadSize::Empty);
        assert_eq!(header.method(), Method::GET);
        assert_eq!(header.version(), Version::HTTP_11);
        assert_eq!(header.uri().path(), "/add-employee");
        assert_eq!(header.uri().query(), Some("department=ops"));
        assert_eq!(header.headers().len(), 3);
        assert_eq!(header.headers().get(http::header::USER_AGENT).unwrap(), "curl/8.4.0");
    }

    #[test]
    fn post_with_length_leaves_body_in_buffer() {
        let text = indoc! {r"
        POST /insert HTTP/1.1
        Host: localhost
        Content-Type: application/x-www-form-urlencoded
        Content-Length: 13

        user_name=ada"};

        let mut buf = BytesMut::from(text.replace('\n', "\r\n").as_str());
        let (header, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(header.method(), Method::POST);
        assert_eq!(payload_size, PayloadSize::Length(13));
        assert_eq!(&buf[..], b"user_name=ada");
    }

    #[test]
    fn delete_with_body_is_framed() {
        let text = indoc! {r"
        DELETE /students/unpaid HTTP/1.1
        Content-Type: application/json
        Content-Length: 2

        "};

        let (_header, payload_size) = decode(text).unwrap().unwrap();
        assert_eq!(payload_size, PayloadSize::Length(2));
    }

    #[test]
    fn chunked_post() {
        let text = indoc! {r"
        POST /update HTTP/1.1
        Transfer-Encoding: chunked

        "};

        let (_header, payload_size) = decode(text).unwrap().unwrap();
        assert_eq!(payload_size, PayloadSize::Chunked);
    }

    #[test]
    fn partial_head_needs_more() {
        assert!(decode("POST /insert HTTP/1.1\nHost: loc").unwrap().is_none());
    }

    #[test]
    fn ambiguous_framing_is_refused() {
        let both = indoc! {r"
        POST /insert HTTP/1.1
        Transfer-Encoding: chunked
        Content-Length: 3

        "};
        assert!(matches!(decode(both), Err(ParseError::InvalidContentLength { .. })));

        let conflicting = indoc! {r"
        POST /insert HTTP/1.1
        Content-Length: 3
        Content-Length: 4

        "};
        assert!(matches!(decode(conflicting), Err(ParseError::InvalidContentLength { .. })));

        let signed = indoc! {r"
        POST /insert HTTP/1.1
        Content-Length: +3

        "};
        assert!(matches!(decode(signed), Err(ParseError::InvalidContentLength { .. })));

        let gzip_only = indoc! {r"
        POST /insert HTTP/1.1
        Transfer-Encoding: gzip

        "};
        assert!(matches!(decode(gzip_only), Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn too_many_headers() {
        let mut text = String::from("GET / HTTP/1.1\n");
        for i in 0..=MAX_HEADER_NUM {
            text.push_str(&format!("x-field-{i}: {i}\n"));
        }
        text.push('\n');

        assert!(matches!(decode(&text), Err(ParseError::TooManyHeaders { .. })));
    }

    #[test]
    fn too_large_head() {
        let text = format!("GET / HTTP/1.1\nx-large: {}\n", "a".repeat(MAX_HEADER_BYTES));
        assert!(matches!(decode(&text), Err(ParseError::HeadTooLarge { .. })));
    }
}
