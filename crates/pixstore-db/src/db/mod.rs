//! Database repositories for data access layer

pub mod image;

pub use image::{ConflictPolicy, ImageRepository};
