//! Classification of a request body's encoding from its `content-type` header.

use std::fmt;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};

/// The body encodings ingestion knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTypeTag {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// header absent, unreadable, or naming any other media type
    Unknown,
}

impl ContentTypeTag {
    /// Classifies a `content-type` header value.
    ///
    /// Matching is a case-insensitive substring search, so parameters such as
    /// `; charset=utf-8` do not matter.
    pub fn classify(value: Option<&HeaderValue>) -> Self {
        let Some(value) = value else {
            return ContentTypeTag::Unknown;
        };

        let Ok(value) = value.to_str() else {
            return ContentTypeTag::Unknown;
        };

        let value = value.to_ascii_lowercase();
        if value.contains(mime::APPLICATION_JSON.essence_str()) {
            ContentTypeTag::Json
        } else if value.contains(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()) {
            ContentTypeTag::FormUrlEncoded
        } else {
            ContentTypeTag::Unknown
        }
    }

    /// Classifies the `content-type` header found in `headers`.
    #[inline]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::classify(headers.get(CONTENT_TYPE))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTypeTag::Json => "json",
            ContentTypeTag::FormUrlEncoded => "form-urlencoded",
            ContentTypeTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(value: &str) -> ContentTypeTag {
        ContentTypeTag::classify(Some(&HeaderValue::from_str(value).unwrap()))
    }

    #[test]
    fn absent_header_is_unknown() {
        assert_eq!(ContentTypeTag::classify(None), ContentTypeTag::Unknown);
        assert_eq!(ContentTypeTag::from_headers(&HeaderMap::new()), ContentTypeTag::Unknown);
    }

    #[test]
    fn matches_with_parameters_and_case() {
        assert_eq!(classify("application/json"), ContentTypeTag::Json);
        assert_eq!(classify("application/json; charset=utf-8"), ContentTypeTag::Json);
        assert_eq!(classify("Application/JSON"), ContentTypeTag::Json);
        assert_eq!(classify("application/x-www-form-urlencoded"), ContentTypeTag::FormUrlEncoded);
        assert_eq!(classify("APPLICATION/X-WWW-FORM-URLENCODED;charset=UTF-8"), ContentTypeTag::FormUrlEncoded);
    }

    #[test]
    fn other_media_types_are_unknown() {
        assert_eq!(classify("text/plain"), ContentTypeTag::Unknown);
        assert_eq!(classify("multipart/form-data; boundary=xyz"), ContentTypeTag::Unknown);
        assert_eq!(classify(""), ContentTypeTag::Unknown);
    }

    #[test]
    fn opaque_header_value_is_unknown() {
        let value = HeaderValue::from_bytes(b"application/json\xff").unwrap();
        assert_eq!(ContentTypeTag::classify(Some(&value)), ContentTypeTag::Unknown);
    }

    #[test]
    fn reads_from_header_map() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert_eq!(ContentTypeTag::from_headers(&headers), ContentTypeTag::Json);
        assert_eq!(ContentTypeTag::from_headers(&headers), ContentTypeTag::Json);
    }
}
