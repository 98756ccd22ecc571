use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use pixstore_core::cancellable;
use pixstore_core::models::UploadResponse;
use pixstore_storage::Storage;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

use super::error::UploadError;
use super::types::UploadRequest;
use crate::filename::Filename;
use crate::format::sniff_format;

/// Verifies image uploads and places them in one bucket.
///
/// Cheap to clone; the storage handle is shared.
#[derive(Clone)]
pub struct Uploader {
    storage: Arc<dyn Storage>,
    bucket: String,
}

impl Uploader {
    pub fn new(storage: Arc<dyn Storage>, bucket: impl Into<String>) -> Self {
        Uploader {
            storage,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Validate, sniff and store one image.
    ///
    /// The payload is buffered once; the sniffer reads its header from the buffer and the
    /// same buffer is handed to `put`. Nothing is written unless the filename is valid and the
    /// sniffed format agrees with its extension. A failed `put` is not retried.
    #[tracing::instrument(
        skip(self, request, cancel),
        fields(bucket = %self.bucket, filename = %request.filename())
    )]
    pub async fn upload(
        &self,
        request: UploadRequest,
        cancel: &CancellationToken,
    ) -> Result<UploadResponse, UploadError> {
        let filename = Filename::parse(request.filename())?;

        let payload = cancellable(cancel, read_payload(request.reader))
            .await?
            .map_err(UploadError::ReadFailed)?;

        let info = sniff_format(Cursor::new(payload.as_ref()))?;
        if !info.kind.matches_extension(filename.extension()) {
            tracing::warn!(
                declared = %filename.extension(),
                detected = %info.kind,
                "Image extension mismatch"
            );
            return Err(UploadError::ExtensionMismatch {
                declared: filename.extension().to_string(),
                detected: info.kind.to_string(),
            });
        }

        let key = filename.variant_key(info.width);
        let size = payload.len();

        let output = cancellable(
            cancel,
            self.storage
                .put(&self.bucket, &key, payload, filename.content_type()),
        )
        .await?
        .map_err(|source| UploadError::UploadFailed {
            key: key.clone(),
            source,
        })?;

        tracing::info!(
            key = %key,
            version_id = %output.version_id,
            width = info.width,
            height = info.height,
            size_bytes = size,
            "Image uploaded"
        );

        Ok(UploadResponse {
            bucket: self.bucket.clone(),
            key,
            name: filename.name().to_string(),
            version_id: output.version_id,
            width: info.width,
            height: info.height,
            extension: filename.extension().to_string(),
            content_type: filename.content_type().to_string(),
        })
    }
}

async fn read_payload(mut reader: Box<dyn AsyncRead + Send + Unpin>) -> std::io::Result<Bytes> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await?;
    Ok(Bytes::from(buffer))
}
