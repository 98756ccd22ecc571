//! Types for the upload pipeline.

use std::fmt;
use std::io;
use std::path::Path;

use bytes::Bytes;
use tokio::io::AsyncRead;

/// Input to [`Uploader::upload`](super::Uploader::upload): a payload stream plus the
/// caller-supplied filename. Consumed by the call.
pub struct UploadRequest {
    pub(crate) reader: Box<dyn AsyncRead + Send + Unpin>,
    filename: String,
}

impl UploadRequest {
    pub fn new<R>(reader: R, filename: impl Into<String>) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        UploadRequest {
            reader: Box::new(reader),
            filename: filename.into(),
        }
    }

    /// Request over an in-memory payload.
    pub fn from_bytes(data: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self::new(io::Cursor::new(data.into()), filename)
    }

    /// Request streaming a file from disk, named after the file's last path component.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(file, filename))
    }

    /// Replace the filename the payload is validated and stored under.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}
