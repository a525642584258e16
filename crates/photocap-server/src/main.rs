//! `photocapd` - the photocap persistence service
//!
//! Loads configuration, opens the backing collection, and serves the write
//! endpoint until the process is stopped. The process start is the whole
//! surface; there are no subcommands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use photocap_server::api::{router, AppState};
use photocap_server::store::{ImageStore, SqliteImageStore};
use photocap_server::Config;

/// photocapd - write-only image persistence service
#[derive(Debug, Parser)]
#[command(name = "photocapd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn default_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_filter()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = Config::load_from(cli.config.clone())?;
    let database_path = config.database_path();

    let store = SqliteImageStore::open(&database_path)?;
    info!(
        "Backing store at {} ({} image(s))",
        database_path.display(),
        store.count().await?
    );

    let state = AppState {
        store: Arc::new(store),
    };

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{addr}");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
