//! Version-gated API server.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ TraceLayer ─▶ Timeout ─▶ negotiate_version ─┬─▶ handler
//!                                                                 │   (RequestVersion attached)
//!                                                                 └─▶ 400 / forwarded error
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use version_gate::config::load_config;
use version_gate::lifecycle::signals;
use version_gate::observability::{logging, metrics};
use version_gate::HttpServer;

#[derive(Parser)]
#[command(name = "version-gate")]
#[command(about = "Serve an API with request-version negotiation", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("version-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    server.run(listener, signals::ctrl_c()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
