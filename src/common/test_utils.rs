use crate::common::EchoServerTrait;
use crate::{HttpConfig, HttpEchoServer, Result};
use std::net::SocketAddr;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Spawns an echo server on an ephemeral loopback port for tests
///
/// Returns the server task, the address it is bound to and the sender that
/// stops it. The socket is bound before this function returns, so clients can
/// connect immediately.
pub async fn spawn_test_server()
-> Result<(JoinHandle<Result<()>>, SocketAddr, broadcast::Sender<()>)> {
    let config = HttpConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        ..HttpConfig::default()
    };

    let server = HttpEchoServer::bind(config).await?;
    let addr = server.local_addr()?;
    let shutdown = server.shutdown_signal();

    let server_handle = tokio::spawn(async move { server.run().await });

    Ok((server_handle, addr, shutdown))
}
