//! Decoder for `transfer-encoding: chunked` payloads.
//!
//! Works line by line: a size line (hex size, optional `;extensions`), the
//! chunk data followed by CRLF, and after the zero sized chunk any trailer
//! fields up to an empty line. Extensions and trailers are discarded.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, PayloadItem};

/// Longest size or trailer line accepted
const MAX_LINE_BYTES: usize = 4 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Size,
    Data(u64),
    DataEnd,
    Trailer,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: State,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self { state: State::Size }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                State::Size => {
                    let Some(line) = take_line(src)? else {
                        return Ok(None);
                    };
                    let size = parse_size(&line)?;
                    trace!(size, "read chunk size");
                    self.state = if size == 0 { State::Trailer } else { State::Data(size) };
                }

                State::Data(remaining) => {
                    if src.is_empty() {
                        return Ok(None);
                    }
                    let take = usize::try_from(remaining).map_or(src.len(), |remaining| remaining.min(src.len()));
                    let bytes = src.split_to(take).freeze();
                    let left = remaining - bytes.len() as u64;
                    self.state = if left == 0 { State::DataEnd } else { State::Data(left) };
                    return Ok(Some(PayloadItem::Chunk(bytes)));
                }

                State::DataEnd => {
                    if src.len() < 2 {
                        return Ok(None);
                    }
                    ensure!(&src[..2] == b"\r\n", ParseError::invalid_chunk("chunk data not followed by CRLF"));
                    src.advance(2);
                    self.state = State::Size;
                }

                State::Trailer => {
                    let Some(line) = take_line(src)? else {
                        return Ok(None);
                    };
                    if line.is_empty() {
                        self.state = State::Done;
                    }
                }

                State::Done => return Ok(Some(PayloadItem::Eof)),
            }
        }
    }
}

/// Removes one CRLF terminated line from `src`, without the CRLF.
fn take_line(src: &mut BytesMut) -> Result<Option<BytesMut>, ParseError> {
    match src.windows(2).position(|window| window == b"\r\n") {
        Some(end) => {
            ensure!(end <= MAX_LINE_BYTES, ParseError::invalid_chunk("chunk line too long"));
            let line = src.split_to(end);
            src.advance(2);
            Ok(Some(line))
        }
        None => {
            ensure!(src.len() <= MAX_LINE_BYTES, ParseError::invalid_chunk("chunk line too long"));
            Ok(None)
        }
    }
}

fn parse_size(line: &[u8]) -> Result<u64, ParseError> {
    let digits = line.split(|b| *b == b';').next().unwrap_or_default().trim_ascii();
    ensure!(
        !digits.is_empty() && digits.iter().all(u8::is_ascii_hexdigit),
        ParseError::invalid_chunk(format!("invalid chunk size line: {}", String::from_utf8_lossy(line)))
    );

    digits.iter().try_fold(0u64, |size, digit| {
        let value = u64::from(char::from(*digit).to_digit(16).unwrap_or_default());
        size.checked_mul(16)
            .and_then(|size| size.checked_add(value))
            .ok_or_else(|| ParseError::invalid_chunk("chunk size overflow"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn decode_all(decoder: &mut ChunkedDecoder, buf: &mut BytesMut) -> Vec<PayloadItem> {
        let mut items = Vec::new();
        while let Some(item) = decoder.decode(buf).unwrap() {
            let eof = item.is_eof();
            items.push(item);
            if eof {
                break;
            }
        }
        items
    }

    #[test]
    fn whole_body() {
        let mut buf = BytesMut::from(&b"5\r\nuser_\r\n8;ext=1\r\nname=ada\r\n0\r\n\r\nGET"[..]);
        let items = decode_all(&mut ChunkedDecoder::new(), &mut buf);

        assert_eq!(
            items,
            vec![
                PayloadItem::Chunk(Bytes::from_static(b"user_")),
                PayloadItem::Chunk(Bytes::from_static(b"name=ada")),
                PayloadItem::Eof,
            ]
        );
        assert_eq!(&buf[..], b"GET");
    }

    #[test]
    fn split_across_reads() {
        let mut decoder = ChunkedDecoder::new();
        let mut buf = BytesMut::from(&b"B\r\n{\"iss"[..]);

        assert_eq!(decoder.decode(&mut buf).unwrap(), Some(PayloadItem::Chunk(Bytes::from_static(b"{\"iss"))));
        assert_eq!(decoder.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"ue\":1}\r");
        assert_eq!(decoder.decode(&mut buf).unwrap(), Some(PayloadItem::Chunk(Bytes::from_static(b"ue\":1}"))));
        assert_eq!(decoder.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"\n0\r\n");
        assert_eq!(decoder.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"Expires: never\r\n\r\n");
        assert_eq!(decoder.decode(&mut buf).unwrap(), Some(PayloadItem::Eof));
        assert!(buf.is_empty());
    }

    #[test]
    fn invalid_size() {
        let mut buf = BytesMut::from(&b"zz\r\n"[..]);
        assert!(matches!(ChunkedDecoder::new().decode(&mut buf), Err(ParseError::InvalidChunk { .. })));

        let mut buf = BytesMut::from(&b"\r\n"[..]);
        assert!(matches!(ChunkedDecoder::new().decode(&mut buf), Err(ParseError::InvalidChunk { .. })));
    }

    #[test]
    fn size_overflow() {
        let mut buf = BytesMut::from(&b"1ffffffffffffffff\r\n"[..]);
        assert!(matches!(ChunkedDecoder::new().decode(&mut buf), Err(ParseError::InvalidChunk { .. })));
    }

    #[test]
    fn missing_crlf_after_data() {
        let mut decoder = ChunkedDecoder::new();
        let mut buf = BytesMut::from(&b"3\r\nabcXY"[..]);

        assert!(decoder.decode(&mut buf).unwrap().unwrap().is_chunk());
        assert!(decoder.decode(&mut buf).is_err());
    }

    #[test]
    fn endless_size_line() {
        let mut buf = BytesMut::from(vec![b'1'; MAX_LINE_BYTES + 1].as_slice());
        assert!(ChunkedDecoder::new().decode(&mut buf).is_err());
    }
}
