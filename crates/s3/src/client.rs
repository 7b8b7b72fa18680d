//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bp-core.

use std::sync::Arc;

use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

use bp_core::endpoint::ENDPOINT_REGION;
use bp_core::{
    ClientConfig, Connect, Error, ListResult, ObjectInfo, ObjectStore, Result, UploadOptions,
};

use crate::multipart;

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from a resolved configuration
    ///
    /// Credentials come from `credentials` when given, otherwise from the
    /// default provider chain. Fails with `Error::Config` when no region or
    /// no credentials can be resolved.
    pub async fn new(
        config: &ClientConfig,
        credentials: Option<SharedCredentialsProvider>,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(provider) = credentials {
            loader = loader.credentials_provider(provider);
        }

        let sdk_config = loader.load().await;

        if sdk_config.region().is_none() {
            return Err(Error::Config(
                "No region could be resolved from the environment".into(),
            ));
        }

        match sdk_config.credentials_provider() {
            Some(provider) => {
                provider.provide_credentials().await.map_err(|e| {
                    Error::Config(format!(
                        "No credentials could be resolved: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;
            }
            None => {
                return Err(Error::Config("No credentials provider configured".into()));
            }
        }

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder
                .endpoint_url(&endpoint.url)
                .force_path_style(endpoint.hostname_immutable);
        }

        tracing::debug!(
            region = ?sdk_config.region(),
            endpoint = config.endpoint.as_ref().map(|e| e.url.as_str()),
            path_style = config.path_style(),
            "Built S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(builder.build()),
        })
    }

    async fn put_single(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Upload(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

/// Location constraint for a bucket created in `region`
///
/// The service rejects an explicit constraint for its default region.
fn location_constraint(region: Option<&str>) -> Option<CreateBucketConfiguration> {
    match region {
        Some(r) if r != ENDPOINT_REGION => Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(r))
                .build(),
        ),
        _ => None,
    }
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::from_second(dt.secs()).ok()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let region = self
            .inner
            .config()
            .region()
            .map(|r| r.to_string());

        self.inner
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(location_constraint(region.as_deref()))
            .send()
            .await
            .map_err(|e| Error::CreateBucket(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<()> {
        if multipart::needs_multipart(data.len() as u64, options) {
            multipart::upload_multipart(&self.inner, bucket, key, &data, options).await
        } else {
            self.put_single(bucket, key, data).await
        }
    }

    async fn list_first_page(&self, bucket: &str, prefix: &str) -> Result<ListResult> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| Error::List(DisplayErrorContext(&e).to_string()))?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let key = object.key().unwrap_or_default();
                let mut info = ObjectInfo::new(key, object.size().unwrap_or(0));

                if let Some(sc) = object.storage_class() {
                    info.storage_class = Some(sc.as_str().to_string());
                }

                info.last_modified = object.last_modified().and_then(to_timestamp);

                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }

                info
            })
            .collect();

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
        })
    }
}

/// Connector that builds an `S3Client` for every resolved configuration
#[derive(Clone, Default)]
pub struct S3Connector {
    credentials: Option<SharedCredentialsProvider>,
}

impl S3Connector {
    /// Connector using the default credential provider chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector using a fixed credential provider
    pub fn with_credentials(provider: impl ProvideCredentials + 'static) -> Self {
        Self {
            credentials: Some(SharedCredentialsProvider::new(provider)),
        }
    }
}

#[async_trait]
impl Connect for S3Connector {
    async fn connect(&self, config: &ClientConfig) -> Result<Arc<dyn ObjectStore>> {
        let client = S3Client::new(config, self.credentials.clone()).await?;
        Ok(Arc::new(client))
    }
}
