use crate::traits::{PutOutput, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
    VersioningConfiguration,
};
use aws_sdk_s3::Client;
use bytes::Bytes;
use pixstore_core::constants::NULL_VERSION_ID;

/// Region in which S3 rejects an explicit location constraint.
const DEFAULT_S3_REGION: &str = "us-east-1";

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `credentials` - Static credentials; when `None` the default AWS provider chain is used
    pub async fn new(
        region: String,
        endpoint_url: Option<String>,
        credentials: Option<Credentials>,
    ) -> StorageResult<Self> {
        let region_provider = RegionProviderChain::first_try(Region::new(region.clone()));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
        if let Some(credentials) = credentials {
            loader = loader.credentials_provider(credentials);
        }
        let shared_config = loader.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(ref endpoint) = endpoint_url {
            // Path-style addressing is required for MinIO and most S3-compatible servers
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }
        let client = Client::from_conf(s3_config_builder.build());

        tracing::debug!(
            region = %region,
            endpoint = endpoint_url.as_deref().unwrap_or("aws"),
            "S3 client configured"
        );

        Ok(S3Storage {
            client,
            region,
            endpoint_url,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }
}

#[async_trait]
impl Storage for S3Storage {
    #[tracing::instrument(skip(self), fields(aws.s3.operation = "HeadBucket"))]
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false)
                {
                    return Ok(false);
                }
                // HeadBucket has no body, so some servers surface a bare 404
                if e.raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false)
                {
                    return Ok(false);
                }
                Err(StorageError::BackendError(
                    DisplayErrorContext(&e).to_string(),
                ))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(aws.s3.operation = "CreateBucket"))]
    async fn make_bucket(&self, bucket: &str, region: &str) -> StorageResult<()> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if region != DEFAULT_S3_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        request.send().await.map_err(|e| {
            tracing::error!(
                error = %DisplayErrorContext(&e),
                bucket = %bucket,
                region = %region,
                "S3 create bucket failed"
            );
            StorageError::BackendError(DisplayErrorContext(&e).to_string())
        })?;

        tracing::info!(bucket = %bucket, region = %region, "S3 bucket created");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(aws.s3.operation = "PutBucketVersioning"))]
    async fn enable_versioning(&self, bucket: &str) -> StorageResult<()> {
        self.client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(
                VersioningConfiguration::builder()
                    .status(BucketVersioningStatus::Enabled)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %bucket,
                    "S3 enable versioning failed"
                );
                StorageError::BackendError(DisplayErrorContext(&e).to_string())
            })?;

        tracing::info!(bucket = %bucket, "S3 bucket versioning enabled");
        Ok(())
    }

    #[tracing::instrument(skip(self, data), fields(
        aws.s3.operation = "PutObject",
        s3.size = data.len()
    ))]
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<PutOutput> {
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .content_length(size as i64)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(DisplayErrorContext(&e).to_string())
            })?;

        let version_id = output.version_id().unwrap_or(NULL_VERSION_ID).to_string();

        tracing::info!(
            bucket = %bucket,
            key = %key,
            version_id = %version_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(PutOutput {
            version_id,
            e_tag: output.e_tag().map(str::to_string),
        })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
