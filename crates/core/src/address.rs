//! Bucket address parsing and endpoint resolution
//!
//! Handles bucket addresses in one of these shapes:
//! - `s3://<bucket>` for the native service
//! - `http://<host>[:port]/<bucket>` or `https://...` for S3-compatible servers
//!
//! The address is split at its final `/`: everything before it is the
//! server, the trailing segment is the bucket name.

use crate::endpoint::ClientConfig;
use crate::error::{Error, Result};

/// Scheme prefix for native S3 buckets
pub const NATIVE_PREFIX: &str = "s3://";

/// Scheme prefixes for custom S3-compatible endpoints
pub const ENDPOINT_PREFIXES: [&str; 2] = ["http://", "https://"];

/// A parsed bucket address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketAddress {
    /// Bucket on the native service, resolved from the environment
    Native {
        /// Bucket name
        bucket: String,
    },
    /// Bucket on a custom server addressed path-style
    Endpoint {
        /// Scheme, host and port of the server
        server: String,
        /// Bucket name
        bucket: String,
    },
}

impl BucketAddress {
    /// Parse an address string
    ///
    /// Fails with `InvalidAddress` when no recognized prefix is present.
    /// Bucket names are not validated; the remote service enforces them.
    pub fn parse(address: &str) -> Result<Self> {
        if address.starts_with(NATIVE_PREFIX) {
            let (_, bucket) = split_address(address);
            return Ok(Self::Native {
                bucket: bucket.to_string(),
            });
        }

        if ENDPOINT_PREFIXES.iter().any(|p| address.starts_with(p)) {
            let (server, bucket) = split_address(address);
            return Ok(Self::Endpoint {
                server: server.to_string(),
                bucket: bucket.to_string(),
            });
        }

        Err(Error::InvalidAddress(format!(
            "'{address}' is missing required scheme prefix (s3://, http:// or https://)"
        )))
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        match self {
            Self::Native { bucket } | Self::Endpoint { bucket, .. } => bucket,
        }
    }

    /// Server part for custom endpoints
    pub fn server(&self) -> Option<&str> {
        match self {
            Self::Native { .. } => None,
            Self::Endpoint { server, .. } => Some(server),
        }
    }

    /// Build the client configuration for this address
    ///
    /// Native buckets get no overrides. Custom endpoints are pinned to the
    /// server with a fixed region and path-style addressing.
    pub fn client_config(&self) -> Result<ClientConfig> {
        match self {
            Self::Native { .. } => Ok(ClientConfig::ambient()),
            Self::Endpoint { server, .. } => {
                let url = url::Url::parse(server)
                    .map_err(|e| Error::Config(format!("Invalid endpoint '{server}': {e}")))?;
                if url.host_str().is_none() {
                    return Err(Error::Config(format!(
                        "Endpoint '{server}' has no host"
                    )));
                }
                Ok(ClientConfig::fixed_endpoint(server.as_str()))
            }
        }
    }
}

impl std::fmt::Display for BucketAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native { bucket } => write!(f, "{NATIVE_PREFIX}{bucket}"),
            Self::Endpoint { server, bucket } => write!(f, "{server}/{bucket}"),
        }
    }
}

/// Split an address at its final `/` into (head, last segment)
///
/// The separator itself belongs to neither half. Without any `/` the whole
/// string is the last segment.
pub fn split_address(address: &str) -> (&str, &str) {
    match address.rfind('/') {
        Some(pos) => (&address[..pos], &address[pos + 1..]),
        None => ("", address),
    }
}

/// Parse an address and build its client configuration
///
/// No network access happens here; every failure is reported before a
/// client exists.
pub fn resolve(address: &str) -> Result<(BucketAddress, ClientConfig)> {
    let parsed = BucketAddress::parse(address)?;
    let config = parsed.client_config()?;
    tracing::debug!(
        address,
        bucket = parsed.bucket(),
        server = parsed.server(),
        path_style = config.path_style(),
        "Resolved bucket address"
    );
    Ok((parsed, config))
}
