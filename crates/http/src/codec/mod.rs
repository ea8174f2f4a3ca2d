//! Streaming codec for HTTP/1.x messages.
//!
//! - [`RequestDecoder`] reads request heads and payloads off a connection
//! - [`ResponseEncoder`] writes response heads and payloads onto it
//!
//! Both work on [`Message`](crate::protocol::Message)s and plug into
//! `tokio_util`'s `FramedRead` and `FramedWrite`.
//!
//! ```
//! use bytes::BytesMut;
//! use micro_ingest_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut buf = BytesMut::from("DELETE /students/unpaid HTTP/1.1\r\n\r\n");
//! let message = RequestDecoder::new().decode(&mut buf).unwrap();
//! assert!(message.is_some_and(|message| message.is_header()));
//! ```

mod body;
mod header;
mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
