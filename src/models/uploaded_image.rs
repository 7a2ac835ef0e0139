use std::path::PathBuf;
use serde::Serialize;

/// A photo written to the upload folder under its generated name.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub filename: String,
    pub path: PathBuf,
}

/// Header data read back from a stored photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String, // "PNG", "JPEG", "GIF", ...
}
