use bytes::{BufMut, Bytes, BytesMut};
use http::{Method, Uri, header};

/// A fully received HTTP request
///
/// Header names keep the casing and order they arrived with; lookups through
/// [`Request::header`] are ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Request {
    /// Creates a request from a method and a raw request target such as `/a/b?x=1`
    ///
    /// Absolute-form targets (`http://host/a/b`) keep only their path and query.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = split_target(target);
        Self {
            method,
            path,
            query,
            headers: Vec::new(),
            body: Bytes::new(),
        }
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

    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE)
    }

    /// Declared body length; missing, unparsable and non-positive values count as zero
    pub fn content_length(&self) -> usize {
        self.header(header::CONTENT_LENGTH)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }

    /// Encodes the request as HTTP/1.1
    ///
    /// A `Content-Length` header is added when the body is non-empty and none
    /// was set explicitly.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(256 + self.body.len());
        buf.put_slice(format!("{} {} HTTP/1.1\r\n", self.method, self.target()).as_bytes());
        for (name, value) in &self.headers {
            buf.put_slice(name.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
        if !self.body.is_empty() && self.header(header::CONTENT_LENGTH).is_none() {
            buf.put_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }
        buf.put_slice(b"\r\n");
        buf.put_slice(&self.body);
        buf
    }

    /// The request target as it appeared on the request line
    pub fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// Splits a request target into path and query, dropping any `#fragment`
///
/// Targets that do not parse as a [`Uri`] are split at the first `?`.
pub fn split_target(target: &str) -> (String, Option<String>) {
    let target = target.split_once('#').map_or(target, |(before, _)| before);
    match target.parse::<Uri>() {
        Ok(uri) => (uri.path().to_string(), uri.query().map(str::to_string)),
        Err(_) => match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        },
    }
}
