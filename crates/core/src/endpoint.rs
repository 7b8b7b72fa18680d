//! Client configuration produced by endpoint resolution
//!
//! A `ClientConfig` carries only what differs between a native S3 bucket
//! and a custom S3-compatible server. Credentials are never stored here:
//! they always come from the ambient provider chain or from a provider
//! injected into the connector.

/// Region pinned for custom S3-compatible endpoints
pub const ENDPOINT_REGION: &str = "us-east-1";

/// Fixed endpoint that replaces the SDK's endpoint resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointOverride {
    /// Endpoint URL (scheme, host and optional port, no trailing slash)
    pub url: String,

    /// When true the client must not rewrite the host into a
    /// virtual-hosted bucket subdomain (path-style addressing)
    pub hostname_immutable: bool,
}

/// Configuration used to build a storage client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Region override. `None` defers to the ambient provider chain.
    pub region: Option<String>,

    /// Endpoint override. `None` uses the native service endpoint.
    pub endpoint: Option<EndpointOverride>,
}

impl ClientConfig {
    /// Configuration that defers region and endpoint to the environment
    pub fn ambient() -> Self {
        Self::default()
    }

    /// Configuration pinned to a custom S3-compatible server
    pub fn fixed_endpoint(url: impl Into<String>) -> Self {
        Self {
            region: Some(ENDPOINT_REGION.to_string()),
            endpoint: Some(EndpointOverride {
                url: url.into(),
                hostname_immutable: true,
            }),
        }
    }

    /// Whether requests must use path-style addressing
    pub fn path_style(&self) -> bool {
        self.endpoint
            .as_ref()
            .map(|e| e.hostname_immutable)
            .unwrap_or(false)
    }
}
