//! Storage abstraction trait
//!
//! This module defines the Storage trait that all object-store backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of a successful put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutput {
    /// Version assigned by the store to this write. Unversioned buckets report `"null"`.
    pub version_id: String,
    pub e_tag: Option<String>,
}

/// Storage abstraction trait
///
/// One handle is shared (behind `Arc<dyn Storage>`) by every concurrent caller, so
/// implementations must be safe for concurrent use without external locking.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check whether a bucket exists
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool>;

    /// Create a bucket in the given region
    async fn make_bucket(&self, bucket: &str, region: &str) -> StorageResult<()>;

    /// Turn on object versioning so every put receives its own version id
    async fn enable_versioning(&self, bucket: &str) -> StorageResult<()>;

    /// Write `data` under `key`, replacing any current object, and return the
    /// version the store assigned to this write.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<PutOutput>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
