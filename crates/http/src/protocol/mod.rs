//! Protocol types shared by the codec and the connection.
//!
//! - [`Message`], [`PayloadItem`] and [`PayloadSize`] describe how a request
//!   or response moves through the codec: one header, then payload chunks,
//!   then eof
//! - [`RequestHeader`] and [`ResponseHead`] are the decoded and encoded heads
//! - [`body::ReqBody`] streams a request payload to the handler
//! - [`HttpError`], [`ParseError`] and [`SendError`] cover the read and write
//!   sides of a connection

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::RequestHeader;

mod response;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

pub mod body;
