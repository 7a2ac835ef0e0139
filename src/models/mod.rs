pub mod geo_location;
pub mod uploaded_image;
