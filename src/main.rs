use std::time::Duration;

use clap::Parser;

/// WebSocket bridge keeping a live message session with a game platform.
#[derive(Parser, Debug)]
#[command(name = "gamelink", version)]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 8082)]
    port: u16,

    /// Seconds a peer may stay silent (no pong) before its session ends.
    #[arg(long, default_value_t = 60)]
    pong_wait_secs: u64,

    /// Seconds allowed for each frame write.
    #[arg(long, default_value_t = 10)]
    write_wait_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting gamelink server");

    let config = gamelink_server::ServerConfig {
        port: args.port,
        pong_wait: Duration::from_secs(args.pong_wait_secs),
        write_wait: Duration::from_secs(args.write_wait_secs),
        ..Default::default()
    };

    let handle = gamelink_server::start(config)
        .await
        .expect("Failed to start server");

    tracing::info!(port = handle.port, "gamelink server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl+c");

    tracing::info!("Shutting down");
}
