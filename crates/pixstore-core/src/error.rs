//! Error types module
//!
//! `AppError` is the caller-facing union of the stage errors raised while uploading and
//! recording images. Each stage crate owns a precise error enum and converts into this one;
//! callers use [`ErrorMetadata`] to decide between retrying and reporting.

use crate::cancel::Cancelled;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected payloads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be presented and handled by a caller.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether the whole operation may be retried
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Image decode failed: {0}")]
    DecodeFailed(String),

    #[error("Extension mismatch: declared {declared}, detected {detected}")]
    ExtensionMismatch { declared: String, detected: String },

    #[error("Upload failed: {message}")]
    UploadFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Metadata store error: {message}")]
    Store {
        message: String,
        recoverable: bool,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl AppError {
    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidFilename(_) => "INVALID_FILENAME",
            AppError::DecodeFailed(_) => "DECODE_FAILED",
            AppError::ExtensionMismatch { .. } => "EXTENSION_MISMATCH",
            AppError::UploadFailed { .. } => "UPLOAD_FAILED",
            AppError::Store { .. } => "STORE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Cancelled(_) => "CANCELLED",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            AppError::UploadFailed { .. } => true,
            AppError::Store { recoverable, .. } => *recoverable,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => true,
            _ => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidFilename(msg) => msg.clone(),
            AppError::DecodeFailed(_) => "File is not a supported image".to_string(),
            AppError::ExtensionMismatch { declared, detected } => format!(
                "File extension {} does not match image content ({})",
                declared, detected
            ),
            AppError::UploadFailed { .. } => "Failed to store image".to_string(),
            AppError::Store { .. } => "Failed to record image metadata".to_string(),
            AppError::Config(msg) => msg.clone(),
            AppError::Cancelled(_) => "Operation cancelled".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal error".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidFilename(_) | AppError::Cancelled(_) => LogLevel::Debug,
            AppError::DecodeFailed(_) | AppError::ExtensionMismatch { .. } => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}
