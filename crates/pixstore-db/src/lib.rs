//! Pixstore Database Library
//!
//! PostgreSQL persistence for image metadata: the [`ImageRepository`], its [`StoreError`]
//! taxonomy, and pool setup with embedded migrations.

pub mod db;
pub mod error;
pub mod setup;

pub use db::{ConflictPolicy, ImageRepository};
pub use error::StoreError;
pub use setup::{connect, setup_database, MIGRATOR};
