pub mod cloudinary_service;
pub mod image_store;

#[cfg(feature = "s3")]
pub mod s3_service;
#[cfg(not(feature = "s3"))]
#[path = "s3_service_stub.rs"]
pub mod s3_service;

pub use cloudinary_service::CloudinaryService;
pub use image_store::{ImageStore, ImageUpload, UploadedImage};
pub use s3_service::S3Service;
