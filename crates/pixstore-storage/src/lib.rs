//! Pixstore Storage Library
//!
//! This crate provides the object-store boundary used by the uploader: the [`Storage`]
//! trait and implementations for S3-compatible services and the local filesystem.
//!
//! # Storage key format
//!
//! Image objects are stored as `{name}/{width}w{extension}`, so every width variant of a
//! logical asset shares the `{name}/` prefix. Keys must not contain `..` or a leading `/`.
//! Key generation is centralized in the [`keys`] module so all backends stay consistent.

pub mod bucket;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use bucket::ensure_bucket;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use pixstore_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{PutOutput, Storage, StorageError, StorageResult};
