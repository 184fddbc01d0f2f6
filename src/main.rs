//! `yannsnote` binary: browse the catalog, run the AI tools and the admin
//! dashboard from a terminal.
//!
//! Logs go to stderr so the dashboard prompt and listings on stdout stay
//! readable. `RUST_LOG` overrides the default filter.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yannsnote::cli::Cli;

/// Our own events at info, dependencies (reqwest, hyper) only when they warn
const DEFAULT_LOG_FILTER: &str = "warn,yannsnote=info";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    Cli::parse().execute().await
}
