use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use tracing::{debug, info};

use super::ReqBody;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize, RequestHeader};

#[derive(Debug)]
pub(crate) enum BodyRequestSignal {
    RequestData,
}

pub(crate) type BodyItem = Result<PayloadItem, ParseError>;

/// Connection side of a request body.
///
/// Reads payload items from the decoded message stream, one per signal from
/// the paired [`ReqBody`].
#[derive(Debug)]
pub struct ReqBodySender<'conn, S> {
    payload_stream: &'conn mut S,
    signal_receiver: mpsc::Receiver<BodyRequestSignal>,
    data_sender: mpsc::Sender<BodyItem>,
    eof: bool,
    broken: bool,
}

impl<'conn, S> ReqBodySender<'conn, S>
where
    S: Stream<Item = Result<Message<(RequestHeader, PayloadSize)>, ParseError>> + Unpin,
{
    /// Creates a body for the payload that follows the last decoded header.
    pub fn channel(payload_stream: &'conn mut S, payload_size: PayloadSize) -> (ReqBody, Self) {
        let (signal_sender, signal_receiver) = mpsc::channel(1);
        let (data_sender, data_receiver) = mpsc::channel(1);

        let body = ReqBody::new(signal_sender, data_receiver, payload_size);
        let sender = Self { payload_stream, signal_receiver, data_sender, eof: false, broken: false };
        (body, sender)
    }

    /// Answers the body's requests until eof, a read failure, or the body is dropped.
    pub async fn send_body(&mut self) {
        while !self.eof && !self.broken {
            if self.signal_receiver.next().await.is_none() {
                return;
            }

            let item = self.read_data().await;
            match &item {
                Ok(payload_item) => self.eof = payload_item.is_eof(),
                Err(_) => self.broken = true,
            }

            if self.data_sender.send(item).await.is_err() {
                debug!("request body dropped while an item was in flight");
                return;
            }
        }
    }

    /// Reads and discards the rest of the payload.
    ///
    /// Fails when the payload could not be read to its end; the connection is
    /// then unusable.
    pub async fn skip_body(&mut self) -> Result<(), ParseError> {
        if self.broken {
            return Err(ParseError::invalid_body("request body stream failed"));
        }

        let mut skipped = 0;
        while !self.eof {
            match self.read_data().await {
                Ok(payload_item) => {
                    skipped += payload_item.remaining();
                    self.eof = payload_item.is_eof();
                }
                Err(e) => {
                    self.broken = true;
                    return Err(e);
                }
            }
        }

        if skipped > 0 {
            info!(size = skipped, "skip unread request body");
        }
        Ok(())
    }

    async fn read_data(&mut self) -> Result<PayloadItem, ParseError> {
        match self.payload_stream.next().await {
            Some(Ok(Message::Payload(payload_item))) => Ok(payload_item),
            Some(Ok(Message::Header(_))) => Err(ParseError::invalid_body("received a request header while reading a body")),
            Some(Err(e)) => Err(e),
            None => Err(ParseError::UnexpectedEof),
        }
    }
}
