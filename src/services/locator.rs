// src/services/locator.rs
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::models::geo_location::GpsFix;
use crate::services::exif_service;

/// Where GPS data comes from, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataBackend {
    /// Parse the EXIF GPS block of the stored photo.
    Exif,
    /// Never look at metadata; every photo gets the demo location.
    Stub,
}

impl MetadataBackend {
    pub fn locate(self, path: &Path) -> Option<GpsFix> {
        match self {
            MetadataBackend::Exif => exif_service::read_gps(path),
            MetadataBackend::Stub => None,
        }
    }
}

impl FromStr for MetadataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exif" => Ok(MetadataBackend::Exif),
            "stub" | "demo" => Ok(MetadataBackend::Stub),
            other => Err(anyhow::anyhow!("unknown METADATA_BACKEND: {}", other)),
        }
    }
}

impl fmt::Display for MetadataBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataBackend::Exif => f.write_str("exif"),
            MetadataBackend::Stub => f.write_str("stub"),
        }
    }
}
