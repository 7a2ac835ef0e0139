use serde::Serialize;

pub const DEMO_LATITUDE: f64 = 55.7558;
pub const DEMO_LONGITUDE: f64 = 37.6176;
const DEMO_ADDRESS: &str = "Moscow, Russia (demo data)";
const DEMO_NOTE: &str = "This photo has no GPS data. Showing demo coordinates instead.";
const MAP_BASE_URL: &str = "https://www.openstreetmap.org/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Exif,
    Demo,
}

/// Position decoded from the GPS block of a photo, in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    pub source: LocationSource,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl GeoLocation {
    pub fn from_fix(fix: GpsFix) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            altitude: Some(fix.altitude),
            source: LocationSource::Exif,
            address: format!("Coordinates: {:.6}, {:.6}", fix.latitude, fix.longitude),
            note: None,
        }
    }

    /// Fixed fallback used when a photo carries no usable GPS data.
    pub fn demo() -> Self {
        Self {
            latitude: DEMO_LATITUDE,
            longitude: DEMO_LONGITUDE,
            altitude: None,
            source: LocationSource::Demo,
            address: DEMO_ADDRESS.to_string(),
            note: Some(DEMO_NOTE.to_string()),
        }
    }

    pub fn resolve(fix: Option<GpsFix>) -> Self {
        fix.map(Self::from_fix).unwrap_or_else(Self::demo)
    }

    pub fn map_url(&self) -> String {
        format!("{}?mlat={}&mlon={}", MAP_BASE_URL, self.latitude, self.longitude)
    }
}
