//! S3 object store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use picflow_core::ObjectMetadata;

use crate::traits::{ObjectStore, SourceObject, StorageError, StorageResult};

/// S3-backed object store.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Create a client from the ambient AWS environment (region, credentials,
    /// endpoint all come from the execution role and environment).
    pub async fn new() -> Self {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(5)
            .with_retry_mode(RetryMode::Adaptive);

        let config = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(retry_config)
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Read the user metadata attached to an object.
    async fn head_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        let response = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    HeadObjectError::NotFound(_) => StorageError::NotFound(key.to_string()),
                    _ => StorageError::BackendError(e.to_string()),
                },
                _ => StorageError::BackendError(e.to_string()),
            })?;

        let metadata = response
            .metadata()
            .cloned()
            .unwrap_or_else(HashMap::new);

        Ok(ObjectMetadata::from(metadata))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<SourceObject> {
        let start = std::time::Instant::now();

        let metadata = self.head_metadata(bucket, key).await?;

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    GetObjectError::NoSuchKey(_) => StorageError::NotFound(key.to_string()),
                    _ => {
                        tracing::error!(
                            error = %e,
                            bucket = %bucket,
                            key = %key,
                            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                            "S3 fetch failed"
                        );
                        StorageError::DownloadFailed(e.to_string())
                    }
                },
                _ => {
                    tracing::error!(
                        error = %e,
                        bucket = %bucket,
                        key = %key,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 fetch failed"
                    );
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes()
            .to_vec();

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = data.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 fetch successful"
        );

        Ok(SourceObject { data, metadata })
    }

    async fn store(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let size = data.len() as u64;

        let user_metadata: HashMap<String, String> = metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .set_metadata(Some(user_metadata))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 store failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 store successful"
        );

        Ok(())
    }
}
