use super::protocol::{self, HttpProtocolError};
use super::{HttpConfig, Request, Response};
use crate::common::EchoServerTrait;
use crate::echo::EchoHandler;
use crate::Result;
use async_trait::async_trait;
use http::{Method, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::{signal, time::timeout};
use tracing::{debug, error, info, warn, Instrument};

/// Turns one parsed request into one response
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Whether the handler serves `method`; unsupported methods get a 501 from the server
    fn supports(&self, _method: &Method) -> bool {
        true
    }

    async fn handle(&self, request: Request) -> Response;
}

/// HTTP/1.1 server that answers one request per connection
///
/// The listening socket is acquired by [`HttpServer::bind_with_handler`] and
/// released when [`EchoServerTrait::run`] returns.
///
/// # Examples
///
/// ```no_run
/// use devecho::{EchoServerTrait, HttpConfig, HttpEchoServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = HttpEchoServer::bind(HttpConfig::default()).await?;
///     println!("listening on {}", server.local_addr()?);
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct HttpServer<H: RequestHandler> {
    config: HttpConfig,
    listener: TcpListener,
    handler: Arc<H>,
    shutdown_signal: broadcast::Sender<()>,
    shutdown_rx: broadcast::Receiver<()>,
}

/// The echo server: an [`HttpServer`] driving the [`EchoHandler`]
pub type HttpEchoServer = HttpServer<EchoHandler>;

impl HttpServer<EchoHandler> {
    /// Binds the echo server to `config.bind_addr`
    pub async fn bind(config: HttpConfig) -> Result<Self> {
        Self::bind_with_handler(config, EchoHandler::new()).await
    }
}

impl<H: RequestHandler> HttpServer<H> {
    pub async fn bind_with_handler(config: HttpConfig, handler: H) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        let (shutdown_signal, shutdown_rx) = broadcast::channel(1);
        Ok(Self {
            config,
            listener,
            handler: Arc::new(handler),
            shutdown_signal,
            shutdown_rx,
        })
    }

    /// The address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Reads one request, dispatches it and writes the response
    async fn handle_connection(
        mut stream: TcpStream,
        addr: SocketAddr,
        config: Arc<HttpConfig>,
        handler: Arc<H>,
    ) -> Result<()> {
        let read = timeout(config.read_timeout, protocol::read_request(&mut stream)).await;
        let request = match read {
            Ok(Ok(request)) => request,
            Ok(Err(HttpProtocolError::IncompleteRequest)) => {
                debug!(%addr, "Client closed connection before sending a request");
                return Ok(());
            }
            Ok(Err(e)) => {
                warn!(%addr, error = %e, "Dropping connection with unreadable request");
                return Ok(());
            }
            Err(_) => {
                warn!(%addr, "Read timeout");
                return Ok(());
            }
        };

        let method = request.method.clone();
        let uri = request.target();
        info!(%addr, %method, %uri, size = request.body.len(), "Received request");

        let response = if handler.supports(&method) {
            handler.handle(request).await
        } else {
            Response::text(
                StatusCode::NOT_IMPLEMENTED,
                format!("Unsupported method ({method})"),
            )
        };
        let response = finalize(response, &config);

        let write = timeout(config.write_timeout, protocol::write_response(&mut stream, &response));
        match write.await {
            Ok(Ok(())) => {
                info!(
                    %addr,
                    %method,
                    %uri,
                    status = response.status.as_u16(),
                    size = response.body.len(),
                    "Sent response"
                );
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                warn!(%addr, "Write timeout");
                return Ok(());
            }
        }

        if let Err(e) = stream.shutdown().await {
            debug!(%addr, error = %e, "Shutdown after response failed");
        }
        Ok(())
    }
}

/// Adds the listener's own headers in front of the handler's
fn finalize(response: Response, config: &HttpConfig) -> Response {
    let mut headers = Vec::with_capacity(response.headers.len() + 3);
    if let Some(server_name) = &config.server_name {
        headers.push(("Server".to_string(), server_name.clone()));
    }
    headers.push(("Date".to_string(), http_date()));
    headers.extend(response.headers);
    headers.push(("Connection".to_string(), "close".to_string()));
    Response {
        status: response.status,
        headers,
        body: response.body,
    }
}

/// Current time in IMF-fixdate form, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

impl<H: RequestHandler> EchoServerTrait for HttpServer<H> {
    /// Accepts connections until Ctrl-C or an internal shutdown signal
    async fn run(self) -> Result<()> {
        let Self {
            config,
            listener,
            handler,
            // Keeps the channel open for `shutdown_rx`
            shutdown_signal: _shutdown_signal,
            mut shutdown_rx,
        } = self;
        let config = Arc::new(config);

        info!(address = %listener.local_addr()?, "HTTP echo server listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            debug!(%addr, "Accepted connection");

                            let config = config.clone();
                            let handler = handler.clone();
                            let span = tracing::info_span!("connection", %addr);
                            tokio::spawn(async move {
                                let result = Self::handle_connection(stream, addr, config, handler)
                                    .instrument(span)
                                    .await;
                                if let Err(e) = result {
                                    error!(%addr, error = %e, "Error handling connection");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server");
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("Received internal shutdown signal, stopping server");
                    break;
                }
            }
        }

        drop(listener);
        info!("HTTP echo server stopped");
        Ok(())
    }

    fn shutdown_signal(&self) -> broadcast::Sender<()> {
        self.shutdown_signal.clone()
    }
}
