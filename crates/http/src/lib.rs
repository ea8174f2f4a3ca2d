//! An asynchronous HTTP/1.1 host layer
//!
//! This crate reads requests off a tcp connection, hands each one to a
//! [`handler::Handler`] with a streaming body, and writes the response back.
//! It is the transport that request body ingestion runs on top of: the
//! handler sees the body as an [`http_body::Body`] delivering fragments in
//! arrival order, with connection failures reported as error frames.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use http_body_util::{BodyExt, Full};
//! use micro_ingest_http::connection::HttpConnection;
//! use micro_ingest_http::handler::make_handler;
//! use micro_ingest_http::protocol::body::ReqBody;
//! use micro_ingest_http::protocol::ParseError;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.expect("bind 127.0.0.1:8080");
//!     let handler = Arc::new(make_handler(echo));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match listener.accept().await {
//!             Ok(accepted) => accepted,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             match HttpConnection::new(reader, writer).process(handler).await {
//!                 Ok(()) => info!("connection finished"),
//!                 Err(e) => error!(cause = %e, "connection failed"),
//!             }
//!         });
//!     }
//! }
//!
//! async fn echo(request: Request<ReqBody>) -> Result<Response<Full<Bytes>>, ParseError> {
//!     let body = request.into_body().collect().await?.to_bytes();
//!     Ok(Response::new(Full::new(body)))
//! }
//! ```
//!
//! # Modules
//!
//! - [`connection`]: the per connection request loop
//! - [`protocol`]: messages, heads, the request body and errors
//! - [`codec`]: HTTP/1.x wire format
//! - [`handler`]: the handler trait
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only, no TLS
//! - request heads are limited to 64 fields and 8KiB

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
