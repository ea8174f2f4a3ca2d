use std::io;

use http::Version;
use thiserror::Error;

/// Everything that ends a connection early.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("failed to read request: {0}")]
    Request(#[from] ParseError),

    #[error("failed to write response: {0}")]
    Response(#[from] SendError),
}

/// Errors raised while reading a request from the connection.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("request head of {size} bytes is over the {limit} byte limit")]
    HeadTooLarge { size: usize, limit: usize },

    #[error("request has more than {limit} header fields")]
    TooManyHeaders { limit: usize },

    #[error("invalid request line: {reason}")]
    InvalidRequestLine { reason: &'static str },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid content-length: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid chunked body: {reason}")]
    InvalidChunk { reason: String },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("connection closed before the request body ended")]
    UnexpectedEof,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ParseError {
    pub fn head_too_large(size: usize, limit: usize) -> Self {
        Self::HeadTooLarge { size, limit }
    }

    pub fn too_many_headers(limit: usize) -> Self {
        Self::TooManyHeaders { limit }
    }

    pub fn invalid_request_line(reason: &'static str) -> Self {
        Self::InvalidRequestLine { reason }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn invalid_chunk<S: ToString>(str: S) -> Self {
        Self::InvalidChunk { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }
}

/// Errors raised while writing a response to the connection.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid response body: {reason}")]
    InvalidBody { reason: String },

    #[error("can not write a {0:?} response")]
    UnsupportedVersion(Version),

    #[error("response written out of order: {reason}")]
    OutOfOrder { reason: &'static str },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SendError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn out_of_order(reason: &'static str) -> Self {
        Self::OutOfOrder { reason }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io(e.into())
    }
}
