//! Payload framing for request bodies and response bodies.
//!
//! Decoders turn the bytes after a request head into [`PayloadItem`]s:
//! [`PayloadDecoder`] picks a length or chunked decoder from the head's
//! [`PayloadSize`]. Encoders do the reverse for response payloads.
//!
//! [`PayloadItem`]: crate::protocol::PayloadItem
//! [`PayloadSize`]: crate::protocol::PayloadSize

mod chunked_decoder;
mod chunked_encoder;
mod length_decoder;
mod length_encoder;
mod payload_decoder;
mod payload_encoder;

pub use payload_decoder::PayloadDecoder;
pub use payload_encoder::PayloadEncoder;
