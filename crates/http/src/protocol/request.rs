use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};

/// The head of a decoded request, before its body is attached.
#[derive(Debug)]
pub struct RequestHeader {
    inner: Request<()>,
}

impl RequestHeader {
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Attaches `body`, producing the request handed to a handler.
    pub fn body<T>(self, body: T) -> Request<T> {
        self.inner.map(|()| body)
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Returns true if the client waits for `100 Continue` before sending the body
    pub fn expects_continue(&self) -> bool {
        self.headers()
            .get(http::header::EXPECT)
            .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"100-continue"))
    }
}

impl From<Parts> for RequestHeader {
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}

impl From<Request<()>> for RequestHeader {
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_continue() {
        let header = RequestHeader::from(Request::post("/insert").header("Expect", "100-Continue").body(()).unwrap());
        assert!(header.expects_continue());

        let header = RequestHeader::from(Request::post("/insert").body(()).unwrap());
        assert!(!header.expects_continue());
    }

    #[test]
    fn attach_body_keeps_head() {
        let header = RequestHeader::from(Request::delete("/students/unpaid").body(()).unwrap());
        let request = header.body("payload");

        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.uri().path(), "/students/unpaid");
        assert_eq!(*request.body(), "payload");
    }
}
