//! Bucket bootstrap: make sure the target bucket exists and keeps object versions.

use crate::traits::{Storage, StorageResult};

/// Create `bucket` in `region` when it does not exist yet, then enable versioning.
///
/// Returns `true` when the bucket had to be created. Safe to call on every startup.
#[tracing::instrument(skip(storage))]
pub async fn ensure_bucket(storage: &dyn Storage, bucket: &str, region: &str) -> StorageResult<bool> {
    let created = if storage.bucket_exists(bucket).await? {
        tracing::info!(bucket = %bucket, "Bucket exists");
        false
    } else {
        storage.make_bucket(bucket, region).await?;
        true
    };

    storage.enable_versioning(bucket).await?;
    Ok(created)
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use crate::LocalStorage;
    use bytes::Bytes;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_bucket_creates_then_reuses() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(ensure_bucket(&storage, "images", "local").await.unwrap());
        assert!(!ensure_bucket(&storage, "images", "local").await.unwrap());
        assert!(storage.bucket_exists("images").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_bucket_enables_versioning() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        ensure_bucket(&storage, "images", "local").await.unwrap();

        let output = storage
            .put("images", "a/1w.png", Bytes::from_static(b"x"), "image/png")
            .await
            .unwrap();
        assert_ne!(output.version_id, "null");
    }
}
