use bytes::{BufMut, Bytes, BytesMut};
use http::StatusCode;
use serde::Serialize;

/// Content type of every JSON response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// An HTTP response ready to be written to a connection
///
/// `Content-Length` is never stored in `headers`; [`Response::encode`] derives
/// it from the body so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Serializes `value` as two-space indented JSON
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> serde_json::Result<Self> {
        let body = serde_json::to_vec_pretty(value)?;
        Ok(Self::new(status)
            .with_header("Content-Type", JSON_CONTENT_TYPE)
            .with_body(body))
    }

    /// Plain text response used for listener-level replies
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the first value of the named header
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 1xx and 204 responses carry neither a body nor `Content-Length`
    fn allows_body(&self) -> bool {
        !(self.status.is_informational() || self.status == StatusCode::NO_CONTENT)
    }

    /// Encodes status line, headers, `Content-Length` and body as HTTP/1.1
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(256 + self.body.len());
        let reason = self.status.canonical_reason().unwrap_or("");
        buf.put_slice(format!("HTTP/1.1 {} {}\r\n", self.status.as_u16(), reason).as_bytes());
        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            buf.put_slice(name.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
        if self.allows_body() {
            buf.put_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }
        buf.put_slice(b"\r\n");
        if self.allows_body() {
            buf.put_slice(&self.body);
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_derives_content_length() {
        let response = Response::text(StatusCode::OK, "héllo")
            .with_header("Content-Length", "999")
            .with_header("X-Test", "1");
        let wire = response.encode();
        let wire = String::from_utf8(wire.to_vec()).unwrap();

        assert!(wire.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(wire.contains("X-Test: 1\r\n"));
        assert!(wire.contains("Content-Length: 6\r\n\r\n"));
        assert!(!wire.contains("999"));
        assert!(wire.ends_with("\r\n\r\nhéllo"));
    }

    #[test]
    fn no_content_has_no_length_or_body() {
        let wire = Response::new(StatusCode::NO_CONTENT)
            .with_body("ignored")
            .encode();
        assert_eq!(&wire[..], b"HTTP/1.1 204 No Content\r\n\r\n");
    }

    #[test]
    fn json_is_pretty_printed() {
        let response = Response::json(StatusCode::OK, &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(response.header("content-type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(&response.body[..], b"{\n  \"a\": 1\n}");
    }
}
