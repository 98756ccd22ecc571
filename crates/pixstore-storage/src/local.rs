use crate::keys::validate_key;
use crate::traits::{PutOutput, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use pixstore_core::constants::NULL_VERSION_ID;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Marker file whose presence turns versioning on for a bucket directory.
const VERSIONING_MARKER: &str = ".versioning";
/// Directory inside a bucket holding every versioned write.
const VERSIONS_DIR: &str = ".versions";

/// Local filesystem storage implementation
///
/// Each bucket is a directory under `base_path`. The current object lives at
/// `{bucket}/{key}`; when versioning is enabled every write is also kept at
/// `{bucket}/.versions/{key}/{version_id}`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path` (e.g. "/var/lib/pixstore")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn bucket_path(&self, bucket: &str) -> StorageResult<PathBuf> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket.starts_with('.') {
            return Err(StorageError::InvalidKey(format!(
                "Invalid bucket name: {}",
                bucket
            )));
        }
        Ok(self.base_path.join(bucket))
    }

    /// Path of the current object for `key`.
    pub fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.bucket_path(bucket)?.join(key))
    }

    /// Path of one stored version of `key`.
    pub fn version_path(&self, bucket: &str, key: &str, version_id: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self
            .bucket_path(bucket)?
            .join(VERSIONS_DIR)
            .join(key)
            .join(version_id))
    }

    async fn is_versioned(&self, bucket_path: &Path) -> StorageResult<bool> {
        Ok(fs::try_exists(bucket_path.join(VERSIONING_MARKER)).await?)
    }

    async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a sibling temp file first so readers never observe a partial object
        let tmp_path = path.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
        let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;
        drop(file);

        fs::rename(&tmp_path, path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to move file {}: {}", path.display(), e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        let path = self.bucket_path(bucket)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn make_bucket(&self, bucket: &str, _region: &str) -> StorageResult<()> {
        let path = self.bucket_path(bucket)?;
        fs::create_dir_all(&path).await?;
        tracing::info!(bucket = %bucket, path = %path.display(), "Local bucket created");
        Ok(())
    }

    async fn enable_versioning(&self, bucket: &str) -> StorageResult<()> {
        let path = self.bucket_path(bucket)?;
        if !fs::try_exists(&path).await? {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }
        fs::write(path.join(VERSIONING_MARKER), b"Enabled").await?;
        tracing::info!(bucket = %bucket, "Local bucket versioning enabled");
        Ok(())
    }

    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<PutOutput> {
        let bucket_path = self.bucket_path(bucket)?;
        if !fs::try_exists(&bucket_path).await? {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }
        let path = self.object_path(bucket, key)?;
        let start = std::time::Instant::now();

        let version_id = if self.is_versioned(&bucket_path).await? {
            let version_id = Uuid::new_v4().simple().to_string();
            let version_path = self.version_path(bucket, key, &version_id)?;
            Self::write_file(&version_path, &data).await?;
            version_id
        } else {
            NULL_VERSION_ID.to_string()
        };

        Self::write_file(&path, &data).await.inspect_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                "Local upload failed"
            );
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            version_id = %version_id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(PutOutput {
            version_id,
            e_tag: None,
        })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage_with_bucket(dir: &Path, bucket: &str) -> LocalStorage {
        let storage = LocalStorage::new(dir).await.unwrap();
        storage.make_bucket(bucket, "local").await.unwrap();
        storage
    }

    #[tokio::test]
    async fn test_bucket_lifecycle() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(!storage.bucket_exists("images").await.unwrap());
        storage.make_bucket("images", "local").await.unwrap();
        assert!(storage.bucket_exists("images").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_unversioned_reports_null_version() {
        let dir = tempdir().unwrap();
        let storage = storage_with_bucket(dir.path(), "images").await;

        let output = storage
            .put("images", "foo/320w.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        assert_eq!(output.version_id, "null");
        let written = std::fs::read(storage.object_path("images", "foo/320w.png").unwrap()).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn test_put_versioned_keeps_every_write() {
        let dir = tempdir().unwrap();
        let storage = storage_with_bucket(dir.path(), "images").await;
        storage.enable_versioning("images").await.unwrap();

        let first = storage
            .put("images", "foo/320w.png", Bytes::from_static(b"one"), "image/png")
            .await
            .unwrap();
        let second = storage
            .put("images", "foo/320w.png", Bytes::from_static(b"two"), "image/png")
            .await
            .unwrap();

        assert_ne!(first.version_id, second.version_id);
        assert_ne!(first.version_id, "null");

        let current = std::fs::read(storage.object_path("images", "foo/320w.png").unwrap()).unwrap();
        assert_eq!(current, b"two");
        let old = std::fs::read(
            storage
                .version_path("images", "foo/320w.png", &first.version_id)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(old, b"one");
    }

    #[tokio::test]
    async fn test_put_missing_bucket() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage
            .put("missing", "foo/1w.png", Bytes::from_static(b"x"), "image/png")
            .await;
        assert!(matches!(result, Err(StorageError::BucketNotFound(_))));
    }

    #[tokio::test]
    async fn test_enable_versioning_missing_bucket() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.enable_versioning("missing").await;
        assert!(matches!(result, Err(StorageError::BucketNotFound(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage_with_bucket(dir.path(), "images").await;

        let result = storage
            .put("images", "../../etc/passwd", Bytes::from_static(b"x"), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .put("images", "/etc/passwd", Bytes::from_static(b"x"), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.bucket_exists("../images").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
