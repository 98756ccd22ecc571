//! Shared key generation for storage backends.
//!
//! Key format: `{name}/{width}w{extension}`, e.g. `foo/320w.png`.

use crate::traits::{StorageError, StorageResult};

/// Derive the object key for one width variant of a logical image.
///
/// `extension` includes its leading dot. The result is deterministic and performs no I/O.
pub fn derive_variant_key(name: &str, width: u32, extension: &str) -> String {
    format!("{}/{}w{}", name, width, extension)
}

/// Reject keys that could escape a bucket directory.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_variant_key() {
        assert_eq!(derive_variant_key("foo", 320, ".png"), "foo/320w.png");
        assert_eq!(derive_variant_key("hero-banner", 1920, ".jpeg"), "hero-banner/1920w.jpeg");
    }

    #[test]
    fn test_variants_share_name_prefix() {
        let small = derive_variant_key("avatar", 64, ".webp");
        let large = derive_variant_key("avatar", 512, ".webp");
        assert_ne!(small, large);
        assert!(small.starts_with("avatar/"));
        assert!(large.starts_with("avatar/"));
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(derive_variant_key("blank", 0, ".gif"), "blank/0w.gif");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("foo/320w.png").is_ok());
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(
            validate_key("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("/etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
