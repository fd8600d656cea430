use crate::Result;

/// Common trait for echo servers
///
/// A server owns its listening socket; `run` consumes it and releases the
/// socket once the accept loop stops.
#[allow(async_fn_in_trait)]
pub trait EchoServerTrait {
    /// Serves connections until Ctrl-C or an internal shutdown signal
    async fn run(self) -> Result<()>;

    /// Returns a shutdown signal sender that can be used to gracefully shutdown the server
    fn shutdown_signal(&self) -> tokio::sync::broadcast::Sender<()>;
}
