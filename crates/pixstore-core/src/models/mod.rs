pub mod image;
pub mod upload;

pub use image::{CreateImage, Image, Pagination};
pub use upload::UploadResponse;
