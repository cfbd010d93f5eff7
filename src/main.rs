//! sciclaims entrypoint

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sciclaims::cli::Cli;

/// Filter used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "sciclaims=info,actix_server=info,warn";

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; `analyze --json` owns stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Cli::parse().execute().await
}
