//! Decoders turning a complete body buffer into a [`DecodedBody`].
//!
//! There is one decoder per recognised [`ContentTypeTag`]:
//!
//! - [`JsonDecoder`] for `application/json`, fails on any syntax error
//! - [`FormDecoder`] for `application/x-www-form-urlencoded`, never fails
//!
//! [`DecoderSet`] dispatches on the tag. An empty buffer, or an
//! [`ContentTypeTag::Unknown`] tag, yields an empty body without calling
//! any decoder.

use serde_json::Value;
use tracing::warn;

use crate::error::DecodeError;
use crate::{ContentTypeTag, DecodedBody};

/// A pure function from a body buffer to a decoded body.
pub trait BodyDecoder {
    fn decode(&self, buf: &[u8]) -> Result<DecodedBody, DecodeError>;
}

/// Decodes a buffer holding a single json object.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecoder;

impl BodyDecoder for JsonDecoder {
    fn decode(&self, buf: &[u8]) -> Result<DecodedBody, DecodeError> {
        match serde_json::from_slice::<Value>(buf)? {
            Value::Object(map) => Ok(map.into()),
            other => Err(DecodeError::not_an_object(&other)),
        }
    }
}

/// Decodes `key=value&key=value` pairs.
///
/// Keys and values are percent-decoded and `+` becomes a space. When a key
/// repeats, the last occurrence wins. A pair without `=` maps to an empty
/// string. Invalid utf-8 is replaced rather than rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormDecoder;

impl BodyDecoder for FormDecoder {
    fn decode(&self, buf: &[u8]) -> Result<DecodedBody, DecodeError> {
        let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(buf).unwrap_or_else(|e| {
            warn!(cause = %e, "form body could not be split into pairs, treating it as empty");
            Vec::new()
        });

        Ok(pairs.into_iter().collect())
    }
}

/// Chooses the decoder for a content type.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecoderSet<J = JsonDecoder, F = FormDecoder> {
    json: J,
    form: F,
}

impl DecoderSet {
    /// The json and form decoders of this crate
    pub fn standard() -> Self {
        Self { json: JsonDecoder, form: FormDecoder }
    }
}

impl<J, F> DecoderSet<J, F>
where
    J: BodyDecoder,
    F: BodyDecoder,
{
    pub fn new(json: J, form: F) -> Self {
        Self { json, form }
    }

    pub fn decode(&self, tag: ContentTypeTag, buf: &[u8]) -> Result<DecodedBody, DecodeError> {
        if buf.is_empty() {
            return Ok(DecodedBody::new());
        }

        match tag {
            ContentTypeTag::Json => self.json.decode(buf),
            ContentTypeTag::FormUrlEncoded => self.form.decode(buf),
            ContentTypeTag::Unknown => Ok(DecodedBody::new()),
        }
    }
}

/// Decodes `buf` with the default decoders.
pub fn decode(tag: ContentTypeTag, buf: &[u8]) -> Result<DecodedBody, DecodeError> {
    DecoderSet::standard().decode(tag, buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn json_round_trip() {
        let value = json!({
            "name": "ada",
            "semester": 4,
            "fee": 1250.5,
            "paid": false,
            "note": null,
        });

        let encoded = serde_json::to_vec(&value).unwrap();
        let decoded = JsonDecoder.decode(&encoded).unwrap();

        assert_eq!(decoded.into_value(), value);
    }

    #[test]
    fn json_keeps_nested_structure() {
        let decoded = JsonDecoder.decode(br#"{"user":{"tags":["a","b"]}}"#).unwrap();
        assert_eq!(decoded.get("user"), Some(&json!({ "tags": ["a", "b"] })));
    }

    #[test]
    fn json_syntax_error() {
        let result = JsonDecoder.decode(b"{bad");
        assert!(matches!(result, Err(DecodeError::MalformedJson { .. })));
    }

    #[test]
    fn json_non_object() {
        assert!(matches!(JsonDecoder.decode(b"[1,2,3]"), Err(DecodeError::NotAnObject { kind: "array" })));
        assert!(matches!(JsonDecoder.decode(b"42"), Err(DecodeError::NotAnObject { kind: "number" })));
    }

    #[test]
    fn form_distinct_keys() {
        let decoded = FormDecoder.decode(b"user_name=ada+lovelace&issue=printer%20on%20fire&sym=%26%3D").unwrap();

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.get_str("user_name"), Some("ada lovelace"));
        assert_eq!(decoded.get_str("issue"), Some("printer on fire"));
        assert_eq!(decoded.get_str("sym"), Some("&="));
    }

    #[test]
    fn form_last_wins() {
        let decoded = FormDecoder.decode(b"a=1&a=2").unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get_str("a"), Some("2"));
    }

    #[test]
    fn form_tolerates_odd_input() {
        let decoded = FormDecoder.decode(b"flag&&=orphan&x=%zz&y=\xff").unwrap();

        assert_eq!(decoded.get_str("flag"), Some(""));
        assert_eq!(decoded.get_str(""), Some("orphan"));
        assert_eq!(decoded.get_str("x"), Some("%zz"));
        assert_eq!(decoded.get_str("y"), Some("\u{fffd}"));
    }

    #[test]
    fn form_values_are_strings() {
        let decoded = FormDecoder.decode(b"exam_fee=0&semester=3").unwrap();
        assert_eq!(decoded.get("exam_fee"), Some(&json!("0")));
    }

    #[test]
    fn empty_buffer_is_empty_for_every_tag() {
        for tag in [ContentTypeTag::Json, ContentTypeTag::FormUrlEncoded, ContentTypeTag::Unknown] {
            assert!(decode(tag, b"").unwrap().is_empty(), "tag {tag}");
        }
    }

    struct CountingDecoder<'a>(&'a Cell<usize>);

    impl BodyDecoder for CountingDecoder<'_> {
        fn decode(&self, _buf: &[u8]) -> Result<DecodedBody, DecodeError> {
            self.0.set(self.0.get() + 1);
            Ok([("called", "yes")].into_iter().collect())
        }
    }

    #[test]
    fn unknown_never_invokes_a_decoder() {
        let calls = Cell::new(0);
        let decoders = DecoderSet::new(CountingDecoder(&calls), CountingDecoder(&calls));

        let decoded = decoders.decode(ContentTypeTag::Unknown, b"{\"a\":1}").unwrap();
        assert!(decoded.is_empty());
        assert_eq!(calls.get(), 0);

        decoders.decode(ContentTypeTag::Json, b"{}").unwrap();
        decoders.decode(ContentTypeTag::FormUrlEncoded, b"a=b").unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn decoding_is_deterministic() {
        let buf = b"b=2&a=1&c=%41";
        assert_eq!(FormDecoder.decode(buf).unwrap(), FormDecoder.decode(buf).unwrap());
    }
}
