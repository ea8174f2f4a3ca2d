use http::Response;

/// The head of a response, written before its payload.
pub type ResponseHead = Response<()>;
