use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::format::ImageKind;

/// Lowercase alphanumerics at both ends, word characters or `-` in between, three characters minimum.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][A-Za-z0-9_-]+[a-z0-9]$").expect("filename pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("invalid filename {0:?}: file name accepts only characters a-z, 0-9, '-' or '_'")]
    InvalidName(String),

    #[error("{0:?} is not a supported image extension")]
    InvalidExtension(String),
}

/// Map a file extension (with or without the leading dot) to its MIME type.
///
/// Lookup is case-insensitive. Non-image types are listed too so that callers can tell an
/// unknown extension apart from a known non-image one.
pub fn extension_to_content_type(ext: &str) -> Option<&'static str> {
    let ext = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();

    let content_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/vnd.microsoft.icon",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(content_type)
}

/// A validated upload filename: base name, extension and declared content type.
///
/// Only constructible through [`Filename::parse`], so every instance satisfies the naming
/// pattern and carries an `image/*` content type for a format the sniffer can decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filename {
    name: String,
    ext: String,
    content_type: &'static str,
}

impl Filename {
    /// Split `raw` at its last `.` and validate both halves.
    ///
    /// The extension is checked first, so `a.svg` reports `InvalidExtension` even though
    /// its name is also too short.
    pub fn parse(raw: &str) -> Result<Self, FilenameError> {
        let ext = split_extension(raw);
        let name = &raw[..raw.len() - ext.len()];

        let content_type = extension_to_content_type(ext)
            .filter(|content_type| content_type.starts_with("image/"))
            .filter(|_| ImageKind::from_extension(ext).is_some())
            .ok_or_else(|| FilenameError::InvalidExtension(ext.to_string()))?;

        if !NAME_PATTERN.is_match(name) {
            return Err(FilenameError::InvalidName(name.to_string()));
        }

        Ok(Filename {
            name: name.to_string(),
            ext: ext.to_string(),
            content_type,
        })
    }

    /// Base name without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extension including the leading dot, e.g. `.png`.
    pub fn extension(&self) -> &str {
        &self.ext
    }

    /// Declared MIME type, e.g. `image/png`.
    pub fn content_type(&self) -> &str {
        self.content_type
    }

    /// Name and extension joined back together.
    pub fn path(&self) -> String {
        format!("{}{}", self.name, self.ext)
    }

    /// Object key of the `width`-pixel variant of this file.
    pub fn variant_key(&self, width: u32) -> String {
        pixstore_storage::keys::derive_variant_key(&self.name, width, &self.ext)
    }
}

impl FromStr for Filename {
    type Err = FilenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filename::parse(s)
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.ext)
    }
}

/// Extension of the last path segment including its dot, or `""` when there is none.
fn split_extension(raw: &str) -> &str {
    match raw.rfind(['.', '/']) {
        Some(idx) if raw[idx..].starts_with('.') => &raw[idx..],
        _ => "",
    }
}
