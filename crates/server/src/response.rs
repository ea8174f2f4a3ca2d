//! Small builders for the responses the services send.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

pub type ResponseBody = Full<Bytes>;

/// Serializes `value` as the json body of a response with `status`.
pub(crate) fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<ResponseBody> {
    match serde_json::to_vec(value) {
        Ok(body) => build(status, mime::APPLICATION_JSON.as_ref(), Bytes::from(body)),
        Err(e) => {
            error!(cause = %e, "failed to serialize response");
            message(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

/// A json `{"message": ...}` response.
pub(crate) fn message(status: StatusCode, message: &str) -> Response<ResponseBody> {
    let body = serde_json::json!({ "message": message }).to_string();
    build(status, mime::APPLICATION_JSON.as_ref(), Bytes::from(body))
}

pub(crate) fn text(status: StatusCode, text: &'static str) -> Response<ResponseBody> {
    build(status, mime::TEXT_PLAIN_UTF_8.as_ref(), Bytes::from_static(text.as_bytes()))
}

/// A `302 Found` back to `location`, the reply of the form-post routes.
pub(crate) fn redirect(location: &'static str) -> Response<ResponseBody> {
    let body = Bytes::from(format!("Found. Redirecting to {location}"));
    let mut response = build(StatusCode::FOUND, mime::TEXT_PLAIN_UTF_8.as_ref(), body);
    response.headers_mut().insert(LOCATION, HeaderValue::from_static(location));
    response
}

pub(crate) fn not_found() -> Response<ResponseBody> {
    message(StatusCode::NOT_FOUND, "not found")
}

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<ResponseBody> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn message_is_json() {
        let response = message(StatusCode::BAD_REQUEST, "Exam fee must be a number or empty.");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"message":"Exam fee must be a number or empty."}"#);
    }

    #[tokio::test]
    async fn redirect_to_index() {
        let response = redirect("/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Found. Redirecting to /");
    }

    #[test]
    fn text_has_charset() {
        let response = text(StatusCode::OK, "insert successful");
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    }
}
