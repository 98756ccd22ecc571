//! Upload pipeline: validate filename → buffer → sniff → derive key → put.

mod error;
mod types;
mod uploader;

pub use error::UploadError;
pub use types::UploadRequest;
pub use uploader::Uploader;
