//! bucket-probe - S3 bucket smoke test
//!
//! Creates (optionally), writes to and lists one bucket on AWS S3 or an
//! S3-compatible server.

use anyhow::Context;
use bucket_probe::probe::{self, Cli};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.debug) {
        eprintln!("{e:#}");
    }

    let exit_code = probe::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}

/// Install the logging subscriber on stderr
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or debug
/// output for this tool's crates with `--debug`.
fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if debug => EnvFilter::new("warn,bucket_probe=debug,bp_core=debug,bp_s3=debug"),
        Err(_) => EnvFilter::new("warn"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize logging")
}
