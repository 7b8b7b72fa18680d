//! bp-s3: S3 SDK adapter for bucket-probe
//!
//! This crate provides the implementation of the ObjectStore trait
//! using the aws-sdk-s3 crate. It is the only crate that directly
//! depends on the AWS SDK.

pub mod client;
pub mod multipart;

#[cfg(test)]
mod test_server;

pub use client::{S3Client, S3Connector};
