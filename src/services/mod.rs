pub mod exif_service;
pub mod locator;
pub mod upload_service;
