use std::net::SocketAddr;
use std::time::Duration;

/// Default address the echo server listens on
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::LOCALHOST, 8787));

/// Configuration for the HTTP echo server
///
/// # Examples
///
/// ```rust
/// use devecho::http::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig {
///     bind_addr: "127.0.0.1:0".parse().unwrap(),
///     read_timeout: Duration::from_secs(5),
///     ..HttpConfig::default()
/// };
/// assert_eq!(config.server_name.as_deref(), Some("wbs-echo/1.0"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Network address to bind to
    pub bind_addr: SocketAddr,
    /// Read timeout for a whole request (head and body)
    pub read_timeout: Duration,
    /// Write timeout for the response
    pub write_timeout: Duration,
    /// Value of the `Server` response header (omitted when `None`)
    pub server_name: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            server_name: Some("wbs-echo/1.0".to_string()),
        }
    }
}
