//! Pixstore Processing Library
//!
//! The upload verification-and-placement pipeline:
//! - [`filename`]: naming and extension policy for incoming files
//! - [`format`]: header-only sniffing of the real image format and dimensions
//! - [`upload`]: the [`Uploader`] that ties both together and writes to object storage

pub mod filename;
pub mod format;
pub mod upload;

pub use filename::{extension_to_content_type, Filename, FilenameError};
pub use format::{sniff_format, DecodeError, ImageInfo, ImageKind};
pub use upload::{UploadError, UploadRequest, Uploader};
