use pixstore_core::{AppError, Cancelled};
use pixstore_storage::StorageError;

use crate::filename::FilenameError;
use crate::format::DecodeError;

/// Failure of one upload call, identifying the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    InvalidFilename(#[from] FilenameError),

    #[error("failed to read upload payload")]
    ReadFailed(#[source] std::io::Error),

    #[error("image decode failed")]
    DecodeFailed(#[from] DecodeError),

    #[error("file extension {declared} does not match detected format {detected}")]
    ExtensionMismatch { declared: String, detected: String },

    #[error("failed to upload object {key}")]
    UploadFailed {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidFilename(e) => AppError::InvalidFilename(e.to_string()),
            UploadError::ReadFailed(source) => AppError::InternalWithSource {
                message: "failed to read upload payload".to_string(),
                source: source.into(),
            },
            UploadError::DecodeFailed(e) => AppError::DecodeFailed(e.to_string()),
            UploadError::ExtensionMismatch { declared, detected } => {
                AppError::ExtensionMismatch { declared, detected }
            }
            UploadError::UploadFailed { key, source } => AppError::UploadFailed {
                message: format!("failed to upload object {}", key),
                source: source.into(),
            },
            UploadError::Cancelled(c) => AppError::Cancelled(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixstore_core::ErrorMetadata;

    #[test]
    fn test_validation_failures_map_to_non_recoverable() {
        let err: AppError =
            UploadError::InvalidFilename(FilenameError::InvalidExtension(".svg".into())).into();
        assert_eq!(err.error_code(), "INVALID_FILENAME");
        assert!(!err.is_recoverable());

        let err: AppError = UploadError::ExtensionMismatch {
            declared: ".png".into(),
            detected: "jpeg".into(),
        }
        .into();
        assert_eq!(err.error_code(), "EXTENSION_MISMATCH");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_put_failure_keeps_cause() {
        let err: AppError = UploadError::UploadFailed {
            key: "foo/320w.png".into(),
            source: StorageError::BackendError("connection reset".into()),
        }
        .into();
        assert_eq!(err.error_code(), "UPLOAD_FAILED");
        assert!(err.is_recoverable());
        assert!(err.detailed_message().contains("connection reset"));
    }
}
