use crate::http::protocol::HttpProtocolError;
use thiserror::Error;

/// Error types for the devecho library
#[derive(Error, Debug)]
pub enum EchoError {
    /// Socket-level errors (bind, accept, connect, read, write)
    #[error("TCP error: {0}")]
    Tcp(#[from] std::io::Error),

    /// Malformed HTTP traffic
    #[error("HTTP error: {0}")]
    Http(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),
}

impl From<HttpProtocolError> for EchoError {
    fn from(err: HttpProtocolError) -> Self {
        match err {
            HttpProtocolError::Io(e) => EchoError::Tcp(e),
            HttpProtocolError::HttpParse(msg) => EchoError::Http(msg),
            HttpProtocolError::InvalidRequest(msg) => EchoError::Http(msg),
            HttpProtocolError::IncompleteRequest => {
                EchoError::Http("Incomplete HTTP request".to_string())
            }
        }
    }
}

/// Result type for the devecho library
pub type Result<T> = std::result::Result<T, EchoError>;

pub mod common;
pub mod echo;
pub mod http;

// Re-export main types for convenience
pub use common::EchoServerTrait;
pub use echo::{EchoHandler, EchoPayload};
pub use crate::http::{HttpClient, HttpConfig, HttpEchoServer, Request, RequestHandler, Response};
