//! bp-core: Core library for the bucket-probe CLI
//!
//! This crate provides the SDK-independent parts of the probe:
//! - Bucket address parsing and endpoint resolution
//! - Client configuration
//! - Settings file management
//! - ObjectStore and Connect traits for storage operations
//!
//! Nothing here depends on a specific S3 SDK, so the orchestration can be
//! tested against a mock store.

pub mod address;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod traits;

pub use address::{BucketAddress, resolve};
pub use config::{Config, ConfigManager};
pub use endpoint::{ClientConfig, EndpointOverride};
pub use error::{Error, Result};
pub use traits::{Connect, ListResult, ObjectInfo, ObjectStore, UploadOptions};
