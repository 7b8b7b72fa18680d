//! Error types for bp-core
//!
//! One error type for every step of the probe. Each variant maps to the
//! exit code the binary reports when that error is fatal.

use thiserror::Error;

/// Result type alias for bp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for probe operations
#[derive(Error, Debug)]
pub enum Error {
    /// Bucket address without a recognized scheme prefix
    #[error("Invalid bucket address: {0}")]
    InvalidAddress(String),

    /// Endpoint, region or settings could not be resolved
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Remote create-bucket failure
    #[error("Failed to create bucket: {0}")]
    CreateBucket(String),

    /// Upload failure (single put or any multipart step)
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Listing failure
    #[error("Listing failed: {0}")]
    List(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidAddress(_) => 2, // UsageError
            Error::Config(_) | Error::Io(_) | Error::TomlParse(_) => 2,
            Error::Upload(_) => 3, // UploadFailed
            Error::List(_) => 4,   // ListFailed
            Error::CreateBucket(_) => 1,
        }
    }
}
