use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::upload::UploadResponse;
use crate::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET};

/// Persisted image metadata, one row per (bucket, key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Image {
    pub id: Uuid,
    pub bucket: String,
    pub key: String,
    pub width: i64,
    pub height: i64,
    /// Latest object-store version recorded for this key
    pub version: String,
    /// Reserved for future use; not populated by uploads
    pub meta: Option<JsonValue>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to insert or refresh an image row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateImage {
    pub bucket: String,
    pub key: String,
    pub width: i64,
    pub height: i64,
    pub version: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateImage {
    pub fn from_upload(upload: &UploadResponse, tags: Vec<String>) -> Self {
        Self {
            bucket: upload.bucket.clone(),
            key: upload.key.clone(),
            width: i64::from(upload.width),
            height: i64::from(upload.height),
            version: upload.version_id.clone(),
            tags,
        }
    }
}

/// Limit/offset window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: DEFAULT_PAGE_OFFSET,
        }
    }
}
