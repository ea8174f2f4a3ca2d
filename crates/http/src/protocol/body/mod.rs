//! Request body streaming between the connection and a handler.
//!
//! The connection owns the decoded message stream, the handler owns the
//! [`ReqBody`]. They are joined by two bounded channels:
//!
//! - the body asks for the next item by sending a signal
//! - the [`ReqBodySender`] answers each signal with one payload item read
//!   from the connection
//!
//! Nothing is read from the socket for a body nobody polls, so a slow handler
//! applies backpressure to the client. Whatever the handler leaves unread is
//! drained by [`ReqBodySender::skip_body`] before the next request is parsed.

mod body_channel;
mod req_body;

pub use body_channel::ReqBodySender;
pub use req_body::ReqBody;
