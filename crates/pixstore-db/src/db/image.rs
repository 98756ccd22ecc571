use pixstore_core::cancellable;
use pixstore_core::models::{CreateImage, Image, Pagination};
use sqlx::{PgPool, Postgres};
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;

const IMAGE_COLUMNS: &str =
    "id, bucket, key, width, height, version, meta, tags, created_at, updated_at";

/// What an upsert overwrites when the (bucket, key) row already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Only `version` and `updated_at`; dimensions and tags keep their first recorded values
    #[default]
    VersionOnly,
    /// `version`, `width`, `height` and `tags`
    Refresh,
}

impl ConflictPolicy {
    fn update_clause(&self) -> &'static str {
        match self {
            ConflictPolicy::VersionOnly => "version = EXCLUDED.version, updated_at = now()",
            ConflictPolicy::Refresh => {
                "version = EXCLUDED.version, width = EXCLUDED.width, height = EXCLUDED.height, \
                 tags = EXCLUDED.tags, updated_at = now()"
            }
        }
    }
}

/// Repository for image metadata rows
#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
    policy: ConflictPolicy,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            policy: ConflictPolicy::default(),
        }
    }

    pub fn with_policy(pool: PgPool, policy: ConflictPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Insert a row for (bucket, key), or update the existing one per the conflict policy.
    ///
    /// One statement, so concurrent calls for the same key never produce two rows. Returns the
    /// row as it is after the write.
    #[tracing::instrument(
        skip(self, req, cancel),
        fields(db.table = "images", db.operation = "upsert", bucket = %req.bucket, key = %req.key)
    )]
    pub async fn create(
        &self,
        req: &CreateImage,
        cancel: &CancellationToken,
    ) -> Result<Image, StoreError> {
        let sql = format!(
            "INSERT INTO images (bucket, key, width, height, version, tags) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (bucket, key) DO UPDATE SET {} \
             RETURNING {}",
            self.policy.update_clause(),
            IMAGE_COLUMNS
        );

        let query = sqlx::query_as::<Postgres, Image>(&sql)
            .bind(&req.bucket)
            .bind(&req.key)
            .bind(req.width)
            .bind(req.height)
            .bind(&req.version)
            .bind(&req.tags)
            .fetch_one(&self.pool);

        let image = cancellable(cancel, query).await??;

        tracing::debug!(id = %image.id, version = %image.version, "Image row upserted");
        Ok(image)
    }

    /// List images in the table's natural scan order; no sort is applied.
    ///
    /// `limit = 0` and offsets past the end both yield an empty list.
    #[tracing::instrument(
        skip(self, cancel),
        fields(db.table = "images", db.operation = "select", limit = page.limit, offset = page.offset)
    )]
    pub async fn find_all(
        &self,
        page: Pagination,
        cancel: &CancellationToken,
    ) -> Result<Vec<Image>, StoreError> {
        let sql = format!("SELECT {} FROM images LIMIT $1 OFFSET $2", IMAGE_COLUMNS);

        let query = sqlx::query_as::<Postgres, Image>(&sql)
            .bind(i64::from(page.limit))
            .bind(i64::from(page.offset))
            .fetch_all(&self.pool);

        Ok(cancellable(cancel, query).await??)
    }

    #[tracing::instrument(skip(self, cancel), fields(db.table = "images", db.operation = "select"))]
    pub async fn get_by_key(
        &self,
        bucket: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Image>, StoreError> {
        let sql = format!(
            "SELECT {} FROM images WHERE bucket = $1 AND key = $2",
            IMAGE_COLUMNS
        );

        let query = sqlx::query_as::<Postgres, Image>(&sql)
            .bind(bucket)
            .bind(key)
            .fetch_optional(&self.pool);

        Ok(cancellable(cancel, query).await??)
    }
}
