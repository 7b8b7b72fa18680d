//! Probe command definition and execution
//!
//! Runs the fixed probe sequence against one bucket address:
//! optional bucket creation, upload of a small object, listing.
//! Each step resolves the address again and connects its own client.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use bp_core::config::DEFAULT_BUCKET_ADDRESS;
use bp_core::{
    Config, ConfigManager, Connect, ListResult, ObjectInfo, Result, UploadOptions, resolve,
};
use bp_s3::S3Connector;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, format_entry};

/// Key the probe object is stored under
pub const OBJECT_KEY: &str = "thing";

/// Payload of the probe object
pub const PAYLOAD: &[u8] = b"blah";

/// bucket-probe - S3 bucket smoke test
///
/// Optionally creates a bucket, uploads a small object to it and lists
/// the bucket. Works against AWS S3 and S3-compatible servers.
#[derive(Parser, Debug)]
#[command(name = "bucket-probe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bucket address: s3://<bucket> or http(s)://<host>[:port]/<bucket>
    #[arg(long = "bucket_address", visible_alias = "bucket-address")]
    pub bucket_address: Option<String>,

    /// Create the bucket before uploading
    #[arg(
        long = "create_bucket",
        visible_alias = "create-bucket",
        default_value = "false"
    )]
    pub create_bucket: bool,

    /// Skip bucket creation even when the settings file enables it
    #[arg(
        long = "no_create_bucket",
        visible_alias = "no-create-bucket",
        conflicts_with = "create_bucket",
        default_value = "false"
    )]
    pub no_create_bucket: bool,

    /// Maximum part transfers in flight for multipart uploads
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, env = "BUCKET_PROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human-readable or JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Effective probe options after merging flags and settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub bucket_address: String,
    pub create_bucket: bool,
    pub upload: UploadOptions,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            bucket_address: DEFAULT_BUCKET_ADDRESS.to_string(),
            create_bucket: false,
            upload: UploadOptions::default(),
        }
    }
}

impl ProbeOptions {
    /// Merge command-line flags over the settings file
    pub fn from_cli(cli: &Cli, settings: &Config) -> Self {
        let mut upload = settings.transfer.upload_options();
        if let Some(n) = cli.concurrency {
            upload = upload.concurrency(n);
        }

        Self {
            bucket_address: cli
                .bucket_address
                .clone()
                .unwrap_or_else(|| settings.defaults.bucket_address.clone()),
            create_bucket: !cli.no_create_bucket
                && (cli.create_bucket || settings.defaults.create_bucket),
            upload,
        }
    }
}

/// Output structure for the listing (JSON format)
#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    bucket: &'a str,
    items: &'a [ObjectInfo],
    truncated: bool,
}

/// Create the bucket named by `address`
pub async fn create_bucket(connector: &dyn Connect, address: &str) -> Result<()> {
    let (parsed, config) = resolve(address)?;
    let store = connector.connect(&config).await?;
    store.create_bucket(parsed.bucket()).await
}

/// Upload `data` under `key` into the bucket named by `address`
pub async fn upload(
    connector: &dyn Connect,
    address: &str,
    key: &str,
    data: &[u8],
    options: &UploadOptions,
) -> Result<()> {
    let (parsed, config) = resolve(address)?;
    let store = connector.connect(&config).await?;
    store
        .upload(parsed.bucket(), key, data.to_vec(), options)
        .await
}

/// List the first page of the bucket named by `address`
///
/// Truncation markers are not followed.
pub async fn list_objects(connector: &dyn Connect, address: &str) -> Result<ListResult> {
    let (parsed, config) = resolve(address)?;
    let store = connector.connect(&config).await?;
    let listing = store.list_first_page(parsed.bucket(), "").await?;

    if listing.truncated {
        tracing::debug!(
            bucket = parsed.bucket(),
            returned = listing.items.len(),
            "Listing truncated after the first page"
        );
    }

    Ok(listing)
}

/// Run the probe sequence and return the exit code
pub async fn run(
    options: &ProbeOptions,
    connector: &dyn Connect,
    formatter: &Formatter,
) -> ExitCode {
    let address = options.bucket_address.as_str();

    if options.create_bucket {
        tracing::info!(address, "Creating bucket");
        match create_bucket(connector, address).await {
            Ok(()) => formatter.success(&format!("Bucket for '{address}' created.")),
            Err(e) => {
                tracing::warn!(address, error = %e, "Bucket creation failed, continuing");
                formatter.warning(&e.to_string());
            }
        }
    }

    tracing::info!(address, key = OBJECT_KEY, bytes = PAYLOAD.len(), "Uploading object");
    if let Err(e) = upload(connector, address, OBJECT_KEY, PAYLOAD, &options.upload).await {
        formatter.error(&e.to_string());
        return ExitCode::from_error(&e);
    }

    tracing::info!(address, "Listing bucket");
    let listing = match list_objects(connector, address).await {
        Ok(listing) => listing,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        let bucket = bp_core::address::split_address(address).1;
        formatter.json(&ListOutput {
            bucket,
            items: &listing.items,
            truncated: listing.truncated,
        });
    } else {
        for item in &listing.items {
            formatter.println(&format_entry(item));
        }
    }

    ExitCode::Success
}

/// Execute the CLI and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    });

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => match ConfigManager::new() {
            Ok(m) => m,
            Err(e) => {
                formatter.error(&e.to_string());
                return ExitCode::from_error(&e);
            }
        },
    };

    let settings = match manager.load() {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&format!(
                "Failed to load settings from {}: {e}",
                manager.config_path().display()
            ));
            return ExitCode::from_error(&e);
        }
    };

    let options = ProbeOptions::from_cli(&cli, &settings);
    run(&options, &S3Connector::new(), &formatter).await
}
