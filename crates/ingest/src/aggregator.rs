//! Aggregation of body fragments into one contiguous buffer.
//!
//! A request body arrives as a sequence of data frames of unknown count and
//! size. [`ChunkAggregator`] appends them in arrival order and hands out the
//! complete buffer once, when the stream has ended. [`aggregate`] drives any
//! [`http_body::Body`] through an aggregator; awaiting the next frame is the
//! only point at which ingestion yields to other requests.
//!
//! A body that errors before its end is reported as
//! [`IngestError::Stream`], never as a shorter buffer.

use std::fmt::Display;
use std::pin::pin;

use bytes::{Bytes, BytesMut};
use http_body::Body;
use http_body_util::BodyExt;
use tracing::trace;

use crate::IngestError;

/// Owns the buffer of one request body while it is being received.
///
/// [`ChunkAggregator::finish`] consumes the aggregator, so a body can be
/// completed at most once and no fragment can follow completion.
#[derive(Debug)]
pub struct ChunkAggregator {
    buf: BytesMut,
    limit: Option<usize>,
    fragments: usize,
}

impl ChunkAggregator {
    /// Creates an aggregator which refuses to grow past `limit` bytes.
    pub fn new(limit: Option<usize>) -> Self {
        Self { buf: BytesMut::new(), limit, fragments: 0 }
    }

    /// Appends the next fragment.
    ///
    /// Fails with [`IngestError::PayloadTooLarge`] when the fragment would
    /// take the buffer over the limit; the aggregator should then be dropped.
    pub fn push(&mut self, fragment: Bytes) -> Result<(), IngestError> {
        if let Some(limit) = self.limit {
            if self.buf.len() + fragment.len() > limit {
                return Err(IngestError::payload_too_large(limit));
            }
        }

        self.buf.extend_from_slice(&fragment);
        self.fragments += 1;
        Ok(())
    }

    /// Bytes received so far
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of fragments received so far
    #[inline]
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Ends aggregation and yields the complete body.
    pub fn finish(self) -> Bytes {
        trace!(size = self.buf.len(), fragments = self.fragments, "body aggregated");
        self.buf.freeze()
    }
}

/// Reads `body` to its end and returns its concatenated data frames.
///
/// Trailer frames are ignored.
pub async fn aggregate<B>(body: B, limit: Option<usize>) -> Result<Bytes, IngestError>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let mut body = pin!(body);
    let mut aggregator = ChunkAggregator::new(limit);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(IngestError::stream)?;
        if let Ok(data) = frame.into_data() {
            aggregator.push(data)?;
        }
    }

    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use http::HeaderMap;
    use http_body::Frame;
    use http_body_util::{Full, StreamBody};
    use std::convert::Infallible;
    use std::io;

    #[test]
    fn appends_in_order() {
        let mut aggregator = ChunkAggregator::new(None);
        aggregator.push(Bytes::from_static(b"user_")).unwrap();
        aggregator.push(Bytes::from_static(b"name=")).unwrap();
        aggregator.push(Bytes::from_static(b"ada")).unwrap();

        assert_eq!(aggregator.fragments(), 3);
        assert_eq!(aggregator.len(), 13);
        assert_eq!(&aggregator.finish()[..], b"user_name=ada");
    }

    #[test]
    fn refuses_past_limit() {
        let mut aggregator = ChunkAggregator::new(Some(8));
        aggregator.push(Bytes::from_static(b"12345")).unwrap();
        aggregator.push(Bytes::from_static(b"678")).unwrap();

        let result = aggregator.push(Bytes::from_static(b"9"));
        assert!(matches!(result, Err(IngestError::PayloadTooLarge { limit: 8 })));
        assert_eq!(aggregator.len(), 8);
    }

    #[tokio::test]
    async fn aggregates_stream_body() {
        let frames: Vec<Result<_, Infallible>> = vec![
            Ok(Frame::data(Bytes::from_static(b"{\"a\""))),
            Ok(Frame::data(Bytes::from_static(b":"))),
            Ok(Frame::data(Bytes::from_static(b"1}"))),
            Ok(Frame::trailers(HeaderMap::new())),
        ];
        let body = StreamBody::new(stream::iter(frames));

        let bytes = aggregate(body, None).await.unwrap();
        assert_eq!(&bytes[..], b"{\"a\":1}");
    }

    #[tokio::test]
    async fn empty_body_yields_empty_buffer() {
        let bytes = aggregate(Full::new(Bytes::new()), None).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn stream_error_is_not_truncation() {
        let frames: Vec<Result<_, io::Error>> = vec![
            Ok(Frame::data(Bytes::from_static(b"a=1&b="))),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer")),
        ];
        let body = StreamBody::new(stream::iter(frames));

        let error = aggregate(body, None).await.unwrap_err();
        assert!(error.is_stream());
        assert!(error.to_string().contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn limit_applies_across_fragments() {
        let frames: Vec<Result<_, Infallible>> =
            vec![Ok(Frame::data(Bytes::from_static(b"aaaa"))), Ok(Frame::data(Bytes::from_static(b"bbbb")))];
        let body = StreamBody::new(stream::iter(frames));

        let error = aggregate(body, Some(6)).await.unwrap_err();
        assert!(matches!(error, IngestError::PayloadTooLarge { limit: 6 }));
    }
}
