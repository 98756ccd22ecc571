//! Pixstore Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the storage, processing and database crates.

pub mod cancel;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use cancel::{cancellable, Cancelled};
pub use config::{Config, DatabaseConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
