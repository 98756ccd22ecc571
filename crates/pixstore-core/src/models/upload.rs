use serde::{Deserialize, Serialize};

/// Placement and decoded properties of a stored image.
///
/// `key` is always the literal object key passed to the object store's `put`
/// (e.g. `foo/320w.png`); `name` is the logical base name it was derived from (`foo`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub bucket: String,
    pub key: String,
    pub name: String,
    pub version_id: String,
    pub width: u32,
    pub height: u32,
    pub extension: String,
    pub content_type: String,
}
