//! Serving requests over one client connection.

mod http_connection;

pub use http_connection::HttpConnection;
