use color_eyre::eyre::{Result, WrapErr};
use devecho::{EchoServerTrait, HttpConfig, HttpEchoServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Logs go to stderr; stdout carries only the startup line
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devecho=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = HttpConfig::default();
    let server = HttpEchoServer::bind(config.clone())
        .await
        .wrap_err_with(|| format!("Failed to bind {}", config.bind_addr))?;

    println!("[wbs] echo server listening on http://{}", config.bind_addr);
    info!(address = %config.bind_addr, "Starting HTTP echo server");

    server.run().await.wrap_err("Failed to run HTTP echo server")?;

    Ok(())
}
