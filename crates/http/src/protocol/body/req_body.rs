use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::channel::mpsc;
use futures::StreamExt;
use http_body::{Body, Frame, SizeHint};
use tracing::error;

use super::body_channel::{BodyItem, BodyRequestSignal};
use crate::protocol::{ParseError, PayloadItem, PayloadSize};

/// Handler side of a request body.
///
/// Each poll that finds no item in flight asks the connection for exactly one
/// more item. A connection failure is yielded as an error frame, never as an
/// early end of stream.
#[derive(Debug)]
pub struct ReqBody {
    signal_sender: mpsc::Sender<BodyRequestSignal>,
    data_receiver: mpsc::Receiver<BodyItem>,
    payload_size: PayloadSize,
    in_flight: bool,
    finished: bool,
}

impl ReqBody {
    pub(crate) fn new(
        signal_sender: mpsc::Sender<BodyRequestSignal>,
        data_receiver: mpsc::Receiver<BodyItem>,
        payload_size: PayloadSize,
    ) -> Self {
        Self { signal_sender, data_receiver, payload_size, in_flight: false, finished: false }
    }

    /// How the payload is framed on the wire
    pub fn payload_size(&self) -> PayloadSize {
        self.payload_size
    }
}

impl Body for ReqBody {
    type Data = Bytes;
    type Error = ParseError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        if this.finished || this.payload_size.is_empty() {
            return Poll::Ready(None);
        }

        if !this.in_flight {
            match this.signal_sender.poll_ready(cx) {
                Poll::Ready(Ok(())) => {}
                Poll::Ready(Err(e)) => {
                    this.finished = true;
                    error!(cause = %e, "connection stopped serving the request body");
                    return Poll::Ready(Some(Err(ParseError::invalid_body("request body channel closed"))));
                }
                Poll::Pending => return Poll::Pending,
            }

            if let Err(e) = this.signal_sender.start_send(BodyRequestSignal::RequestData) {
                this.finished = true;
                error!(cause = %e, "failed to request more body data");
                return Poll::Ready(Some(Err(ParseError::invalid_body("request body channel closed"))));
            }
            this.in_flight = true;
        }

        let item = match this.data_receiver.poll_next_unpin(cx) {
            Poll::Ready(item) => item,
            Poll::Pending => return Poll::Pending,
        };

        this.in_flight = false;
        match item {
            Some(Ok(PayloadItem::Chunk(bytes))) => Poll::Ready(Some(Ok(Frame::data(bytes)))),
            Some(Ok(PayloadItem::Eof)) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Some(Err(e)) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.finished = true;
                Poll::Ready(Some(Err(ParseError::invalid_body("request body channel closed"))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.finished || self.payload_size.is_empty()
    }

    fn size_hint(&self) -> SizeHint {
        if self.finished {
            return SizeHint::with_exact(0);
        }
        self.payload_size.into()
    }
}
