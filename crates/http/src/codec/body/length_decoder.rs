use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::protocol::{ParseError, PayloadItem};

/// Yields exactly `content-length` bytes, then eof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    remaining: u64,
}

impl LengthDecoder {
    pub fn new(length: u64) -> Self {
        Self { remaining: length }
    }
}

impl Decoder for LengthDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.remaining == 0 {
            return Ok(Some(PayloadItem::Eof));
        }

        if src.is_empty() {
            return Ok(None);
        }

        let take = usize::try_from(self.remaining).map_or(src.len(), |remaining| remaining.min(src.len()));
        let bytes = src.split_to(take).freeze();
        self.remaining -= bytes.len() as u64;

        Ok(Some(PayloadItem::Chunk(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_length() {
        let mut buf = BytesMut::from(&b"user_name=adaGET / HTTP/1.1\r\n"[..]);
        let mut decoder = LengthDecoder::new(13);

        let item = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(item.as_bytes().unwrap().as_ref(), b"user_name=ada");
        assert_eq!(decoder.decode(&mut buf).unwrap(), Some(PayloadItem::Eof));
        assert_eq!(&buf[..], b"GET / HTTP/1.1\r\n");
    }

    #[test]
    fn arrives_in_pieces() {
        let mut decoder = LengthDecoder::new(6);

        let mut buf = BytesMut::from(&b"a=1"[..]);
        assert_eq!(decoder.decode(&mut buf).unwrap().unwrap().remaining(), 3);
        assert_eq!(decoder.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"&b=");
        assert_eq!(decoder.decode(&mut buf).unwrap().unwrap().remaining(), 3);
        assert!(decoder.decode(&mut buf).unwrap().unwrap().is_eof());
    }

    #[test]
    fn zero_length_is_eof() {
        let mut decoder = LengthDecoder::new(0);
        assert_eq!(decoder.decode(&mut BytesMut::new()).unwrap(), Some(PayloadItem::Eof));
    }
}
