//! ObjectStore trait definition
//!
//! This trait defines the three storage operations the probe performs.
//! It keeps the orchestration decoupled from the S3 SDK so it can be
//! exercised against a mock store.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::endpoint::ClientConfig;
use crate::error::Result;

/// Default number of part transfers in flight for one upload
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Default part size: 8 MiB
pub const DEFAULT_PART_SIZE: u64 = 8 * 1024 * 1024;

/// Minimum part size: 5 MiB (S3 requirement)
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum part size: 5 GiB
pub const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Metadata for one listed object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,

    /// Human-readable size
    pub size_human: String,

    /// Storage class as reported by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object of the given size
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: size,
            size_human: humansize::format_size(size.max(0) as u64, humansize::BINARY),
            storage_class: None,
            last_modified: None,
            etag: None,
        }
    }

    /// Set the storage class
    pub fn with_storage_class(mut self, class: impl Into<String>) -> Self {
        self.storage_class = Some(class.into());
        self
    }
}

/// First page of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListResult {
    /// Listed objects, in the order the service returned them
    pub items: Vec<ObjectInfo>,

    /// Whether the service holds more entries than this page
    pub truncated: bool,
}

/// Options for an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Maximum part transfers in flight
    pub concurrency: usize,

    /// Part size in bytes; payloads up to this size use a single request
    pub part_size: u64,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            part_size: DEFAULT_PART_SIZE,
        }
    }
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn part_size(mut self, size: u64) -> Self {
        self.part_size = size.clamp(MIN_PART_SIZE, MAX_PART_SIZE);
        self
    }
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
/// Every method issues its remote requests exactly once.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create a bucket
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload a payload under a key, splitting it into parts when it
    /// exceeds the configured part size
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<()>;

    /// List the first page of objects under a prefix
    async fn list_first_page(&self, bucket: &str, prefix: &str) -> Result<ListResult>;
}

/// Builds an object store from a resolved client configuration
#[async_trait]
pub trait Connect: Send + Sync {
    async fn connect(&self, config: &ClientConfig) -> Result<Arc<dyn ObjectStore>>;
}
