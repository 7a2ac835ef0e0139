// src/dtos/analyze_dtos.rs
use serde::Serialize;

use crate::models::geo_location::GeoLocation;
use crate::models::uploaded_image::ImageInfo;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub filename: String,
    pub image_info: ImageInfo,
    pub location: GeoLocation,
    pub map_url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
