use super::{Request, Response};
use crate::{EchoError, Result};
use http::{Method, StatusCode};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Minimal HTTP/1.1 client for talking to the echo server
///
/// Each call opens a fresh connection, writes one request and reads the
/// response until the server closes the connection.
///
/// # Examples
///
/// ```no_run
/// use devecho::HttpClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HttpClient::new("127.0.0.1:8787".parse()?);
///     let response = client.get("/hello?x=1").await?;
///     println!("{}", String::from_utf8_lossy(&response.body));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    addr: SocketAddr,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: Duration::from_secs(10),
        }
    }

    /// The server address requests are sent to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Sets the timeout applied to connecting and to the whole exchange
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn get(&self, target: &str) -> Result<Response> {
        self.send(&Request::new(Method::GET, target)).await
    }

    /// Sends `request`, adding a `Host` header when it has none
    pub async fn send(&self, request: &Request) -> Result<Response> {
        let mut request = request.clone();
        if request.header(http::header::HOST).is_none() {
            request.headers.insert(0, ("Host".to_string(), self.addr.to_string()));
        }
        let raw = self.send_raw(&request.encode()).await?;
        parse_response(&raw)
    }

    /// Writes raw bytes and returns everything the server sends back before closing
    pub async fn send_raw(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut stream = timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| EchoError::Timeout(format!("connecting to {}", self.addr)))??;

        let exchange = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            let mut raw = Vec::new();
            stream.read_to_end(&mut raw).await?;
            Ok::<_, std::io::Error>(raw)
        };

        let raw = timeout(self.timeout, exchange)
            .await
            .map_err(|_| EchoError::Timeout(format!("waiting for response from {}", self.addr)))??;
        Ok(raw)
    }
}

/// Parses a complete HTTP/1.1 response
///
/// The body is everything after the head, cut to `Content-Length` when the
/// header is present.
pub fn parse_response(raw: &[u8]) -> Result<Response> {
    let mut headers = [httparse::EMPTY_HEADER; super::protocol::MAX_HEADERS];
    let mut parsed = httparse::Response::new(&mut headers);

    let head_len = match parsed.parse(raw) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => {
            return Err(EchoError::Http("Incomplete HTTP response".to_string()));
        }
        Err(e) => return Err(EchoError::Http(format!("Failed to parse response: {e}"))),
    };

    let code = parsed
        .code
        .ok_or_else(|| EchoError::Http("Missing status code".to_string()))?;
    let status = StatusCode::from_u16(code)
        .map_err(|e| EchoError::Http(format!("Invalid status code {code}: {e}")))?;

    let mut response = Response::new(status);
    response.headers = parsed
        .headers
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let mut body = &raw[head_len..];
    if let Some(len) = response
        .header(http::header::CONTENT_LENGTH)
        .and_then(|v| v.trim().parse::<usize>().ok())
    {
        body = &body[..len.min(body.len())];
    }
    response.body = bytes::Bytes::copy_from_slice(body);
    Ok(response)
}
