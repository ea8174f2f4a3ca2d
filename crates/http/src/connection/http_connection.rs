use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::header::CONNECTION;
use http::{HeaderMap, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Empty};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::select;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::body::ReqBodySender;
use crate::protocol::{HttpError, Message, ParseError, PayloadItem, PayloadSize, RequestHeader, ResponseHead, SendError};

/// One client connection, serving its requests one after another.
///
/// For each request the handler runs concurrently with the body pump, so a
/// handler that reads its body and a connection that feeds it never wait on
/// each other. Whatever body the handler leaves unread is drained before the
/// next request is read.
///
/// A response carrying `connection: close` is written as soon as the handler
/// returns, without waiting for the rest of the body, and ends the connection.
///
/// Otherwise, if the request body cannot be read to its end the connection is
/// closed without a response, whatever the handler returned.
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
        H::RespBody: Body<Data = Bytes> + Unpin,
        <H::RespBody as Body>::Error: Display,
    {
        loop {
            match self.framed_read.next().await {
                Some(Ok(Message::Header((header, payload_size)))) => {
                    if !self.do_process(header, payload_size, handler.as_ref()).await? {
                        return Ok(());
                    }
                }

                Some(Ok(Message::Payload(_))) => {
                    error!("received payload while waiting for a request head");
                    self.do_send_response(build_error_response(StatusCode::BAD_REQUEST)).await?;
                    return Err(ParseError::invalid_body("payload without a request head").into());
                }

                Some(Err(e)) => {
                    error!(cause = %e, "can't decode next request");
                    self.do_send_response(build_error_response(StatusCode::BAD_REQUEST)).await?;
                    return Err(e.into());
                }

                None => {
                    debug!("client closed the connection");
                    return Ok(());
                }
            }
        }
    }

    /// Serves one request. Returns whether the connection stays open.
    async fn do_process<H>(&mut self, header: RequestHeader, payload_size: PayloadSize, handler: &H) -> Result<bool, HttpError>
    where
        H: Handler + ?Sized,
        H::RespBody: Body<Data = Bytes> + Unpin,
        <H::RespBody as Body>::Error: Display,
    {
        if header.expects_continue() && !payload_size.is_empty() {
            let writer = self.framed_write.get_mut();
            writer.write_all(b"HTTP/1.1 100 Continue\r\n\r\n").await.map_err(SendError::io)?;
            writer.flush().await.map_err(SendError::io)?;
            info!("sent 100 continue");
        }

        let (req_body, mut body_sender) = ReqBodySender::channel(&mut self.framed_read, payload_size);
        let request = header.body(req_body);

        let response_result = {
            let handle = handler.call(request);
            let pump = body_sender.send_body();
            tokio::pin!(handle, pump);

            let mut pump_done = false;
            loop {
                select! {
                    biased;
                    response = &mut handle => break response,
                    () = &mut pump, if !pump_done => pump_done = true,
                }
            }
        };

        if matches!(&response_result, Ok(response) if closes_connection(response.headers())) {
            info!("response closes the connection, leave the rest of the request body unread");
            self.send_response(response_result).await?;
            return Ok(false);
        }

        if let Err(e) = body_sender.skip_body().await {
            error!(cause = %e, "request body could not be read to its end, close connection without response");
            return Err(e.into());
        }

        self.send_response(response_result).await?;
        Ok(true)
    }

    async fn send_response<T, E>(&mut self, response_result: Result<Response<T>, E>) -> Result<(), HttpError>
    where
        T: Body<Data = Bytes> + Unpin,
        T::Error: Display,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        match response_result {
            Ok(response) => self.do_send_response(response).await,
            Err(e) => {
                let e = e.into();
                error!(cause = %e, "handler failed");
                self.do_send_response(build_error_response(StatusCode::INTERNAL_SERVER_ERROR)).await
            }
        }
    }

    async fn do_send_response<T>(&mut self, response: Response<T>) -> Result<(), HttpError>
    where
        T: Body<Data = Bytes> + Unpin,
        T::Error: Display,
    {
        let (parts, mut body) = response.into_parts();
        let payload_size = PayloadSize::from(body.size_hint());

        let head = Message::<_, Bytes>::Header((ResponseHead::from_parts(parts, ()), payload_size));
        self.framed_write.feed(head).await?;

        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(|e| SendError::invalid_body(format!("response body failed: {e}")))?;
            if let Ok(data) = frame.into_data() {
                self.framed_write.feed(Message::Payload(PayloadItem::Chunk(data))).await?;
            }
        }

        self.framed_write.send(Message::Payload(PayloadItem::<Bytes>::Eof)).await?;
        Ok(())
    }
}

fn closes_connection(headers: &HeaderMap) -> bool {
    headers.get(CONNECTION).is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"close"))
}

fn build_error_response(status_code: StatusCode) -> Response<Empty<Bytes>> {
    let mut response = Response::new(Empty::new());
    *response.status_mut() = status_code;
    response
}
