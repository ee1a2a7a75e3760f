//! vhost-server
//!
//! Serves the virtual hosts listed in a TOML config, or checks offline which
//! host a given Host header value would be dispatched to.
//!
//! ```text
//!   Client Request ──▶ TraceLayer ──▶ TimeoutLayer ──▶ vhost[0] ──▶ vhost[1] ──▶ ... ──▶ 404
//!                                                         │            │
//!                                                         ▼            ▼
//!                                                   site handler  site handler
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;

use vhost::config::{load_config, VhostConfig};
use vhost::observability::init_logging;
use vhost::http::SiteMatch;
use vhost::{Shutdown, VhostServer};

#[derive(Parser)]
#[command(name = "vhost-server")]
#[command(about = "Host header based request dispatch", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured virtual hosts (default)
    Serve,
    /// Print which virtual host a Host header value resolves to
    Match {
        /// Host header value, e.g. "api.example.com:8080"
        host: String,
    },
}

fn read_config(path: Option<&Path>) -> Result<VhostConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(VhostConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = read_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Match { host } => {
            let server = VhostServer::new(config)?;
            match server.resolve(&host) {
                Some((name, data)) => {
                    let output = SiteMatch { vhost: name, data: &data };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                None => println!("No virtual host matched '{}'", host),
            }
            Ok(())
        }
    }
}

async fn serve(config: VhostConfig) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&config.observability);

    let server = VhostServer::new(config)?;
    let config = server.config();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        vhosts = config.vhosts.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal.trigger(),
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
        }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
