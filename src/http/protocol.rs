use super::{Request, Response};
use bytes::BytesMut;
use http::Method;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Maximum number of headers accepted in a request head
pub const MAX_HEADERS: usize = 64;
/// Request heads larger than this are rejected as malformed
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

const READ_CHUNK: usize = 16 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum HttpProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("HTTP parsing error: {0}")]
    HttpParse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Incomplete request")]
    IncompleteRequest,
}

/// Reads one request from `stream`
///
/// The head is buffered until `httparse` reports it complete. The body is then
/// read up to the declared `Content-Length`; if the peer closes early or a read
/// fails, the bytes received so far become the body.
pub async fn read_request<S>(stream: &mut S) -> Result<Request, HttpProtocolError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(4096);

    let (mut request, head_len) = loop {
        let n = stream.read_buf(&mut buf).await?;
        if n == 0 {
            return Err(HttpProtocolError::IncompleteRequest);
        }

        if let Some(parsed) = parse_head(&buf)? {
            break parsed;
        }

        if buf.len() > MAX_HEAD_SIZE {
            return Err(HttpProtocolError::HttpParse(format!(
                "request head exceeds {MAX_HEAD_SIZE} bytes"
            )));
        }
    };

    let expected = request.content_length();
    let mut body = buf.split_off(head_len);
    body.truncate(expected);

    while body.len() < expected {
        body.reserve((expected - body.len()).min(READ_CHUNK));
        match stream.read_buf(&mut body).await {
            Ok(0) => {
                debug!(expected, received = body.len(), "Peer closed before full body");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, received = body.len(), "Body read failed, keeping partial body");
                break;
            }
        }
    }
    body.truncate(expected);

    request.body = body.freeze();
    Ok(request)
}

/// Parses a request head, returning `None` while more bytes are needed
fn parse_head(buf: &[u8]) -> Result<Option<(Request, usize)>, HttpProtocolError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);

    let head_len = match req.parse(buf) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => return Ok(None),
        Err(e) => {
            return Err(HttpProtocolError::HttpParse(format!(
                "Failed to parse headers: {e}"
            )));
        }
    };

    let method = req
        .method
        .ok_or_else(|| HttpProtocolError::InvalidRequest("missing method".to_string()))?;
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| HttpProtocolError::InvalidRequest(format!("invalid method {method:?}")))?;
    let target = req
        .path
        .ok_or_else(|| HttpProtocolError::InvalidRequest("missing request target".to_string()))?;

    let mut request = Request::new(method, target);
    request.headers = req
        .headers
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    Ok(Some((request, head_len)))
}

/// Writes an encoded response and flushes the stream
pub async fn write_response<S>(stream: &mut S, response: &Response) -> Result<(), HttpProtocolError>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&response.encode()).await?;
    stream.flush().await?;
    Ok(())
}
