//! colab-tunnel - SSH access to ephemeral notebook instances

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use colab_tunnel::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "colab_tunnel=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
