//! Object-store abstraction trait.

use async_trait::async_trait;
use thiserror::Error;

use picflow_core::ObjectMetadata;

/// Storage operation errors. All variants are treated as transient by the
/// transport adapters: redelivery may succeed where the first attempt failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A fetched source object: its bytes and the user metadata attached by the
/// upstream ingestion component.
#[derive(Debug, Clone)]
pub struct SourceObject {
    pub data: Vec<u8>,
    pub metadata: ObjectMetadata,
}

/// Object-store abstraction.
///
/// Both operations take an explicit bucket: sources arrive from whichever
/// bucket the event names, outputs go to the configured destination bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes and user metadata.
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<SourceObject>;

    /// Write an object with the given content type and user metadata.
    async fn store(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()>;
}
