// src/services/exif_service.rs
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use exif::{Exif, In, Tag, Value};
use image::ImageReader;
use log::{debug, warn};
use thiserror::Error;

use crate::models::geo_location::GpsFix;
use crate::models::uploaded_image::ImageInfo;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("unrecognised image format")]
    UnknownFormat,
}

/// Reads width, height and format from the image header.
/// The format comes from the file content only, never from its name.
pub fn inspect_image(path: &Path) -> Result<ImageInfo, DecodeError> {
    let file = BufReader::new(File::open(path)?);
    let reader = ImageReader::new(file).with_guessed_format()?;
    let format = reader.format().ok_or(DecodeError::UnknownFormat)?;
    let (width, height) = reader.into_dimensions()?;
    Ok(ImageInfo {
        width,
        height,
        format: format!("{:?}", format).to_uppercase(),
    })
}

/// Raw GPS coordinate as stored in the tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Sexagesimal { degrees: f64, minutes: f64, seconds: f64 },
    Decimal(f64),
}

impl Coordinate {
    pub fn to_decimal(self) -> f64 {
        match self {
            Coordinate::Sexagesimal { degrees, minutes, seconds } => {
                degrees + minutes / 60.0 + seconds / 3600.0
            }
            Coordinate::Decimal(value) => value,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let parts: Vec<f64> = match value {
            Value::Rational(v) => v.iter().map(|r| r.to_f64()).collect(),
            Value::SRational(v) => v.iter().map(|r| r.to_f64()).collect(),
            Value::Double(v) => v.clone(),
            Value::Float(v) => v.iter().map(|f| f64::from(*f)).collect(),
            _ => return None,
        };
        match parts.as_slice() {
            [degrees, minutes, seconds, ..] => Some(Coordinate::Sexagesimal {
                degrees: *degrees,
                minutes: *minutes,
                seconds: *seconds,
            }),
            [value] => Some(Coordinate::Decimal(*value)),
            _ => None,
        }
    }
}

/// The GPS tags the locator understands. Anything else in the block is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsTags {
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    pub latitude_ref: Option<char>,
    pub longitude_ref: Option<char>,
    pub altitude: Option<f64>,
}

impl GpsTags {
    pub fn from_exif(exif: &Exif) -> Self {
        let field = |tag: Tag| exif.get_field(tag, In::PRIMARY).map(|f| &f.value);
        Self {
            latitude: field(Tag::GPSLatitude).and_then(Coordinate::from_value),
            longitude: field(Tag::GPSLongitude).and_then(Coordinate::from_value),
            latitude_ref: field(Tag::GPSLatitudeRef).and_then(ref_char),
            longitude_ref: field(Tag::GPSLongitudeRef).and_then(ref_char),
            altitude: field(Tag::GPSAltitude).and_then(scalar),
        }
    }

    /// Signed decimal position, or `None` unless both coordinates are present and in range.
    pub fn to_fix(&self) -> Option<GpsFix> {
        let mut latitude = self.latitude?.to_decimal();
        let mut longitude = self.longitude?.to_decimal();
        if self.latitude_ref == Some('S') {
            latitude = -latitude;
        }
        if self.longitude_ref == Some('W') {
            longitude = -longitude;
        }

        if !latitude.is_finite() || !longitude.is_finite()
            || latitude.abs() > 90.0 || longitude.abs() > 180.0
        {
            warn!("Discarding out of range GPS position {}, {}", latitude, longitude);
            return None;
        }

        Some(GpsFix {
            latitude,
            longitude,
            altitude: self.altitude.filter(|a| a.is_finite()).unwrap_or(0.0),
        })
    }
}

fn ref_char(value: &Value) -> Option<char> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .and_then(|s| s.first())
            .map(|b| b.to_ascii_uppercase() as char),
        _ => None,
    }
}

fn scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Rational(v) => v.first().map(|r| r.to_f64()),
        Value::SRational(v) => v.first().map(|r| r.to_f64()),
        Value::Double(v) => v.first().copied(),
        Value::Float(v) => v.first().map(|f| f64::from(*f)),
        _ => None,
    }
}

fn is_gif(header: &[u8]) -> bool {
    header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a")
}

/// GPS position embedded in the photo at `path`, if any.
///
/// Missing or malformed metadata is a normal outcome here, so every failure is
/// logged and mapped to `None`.
pub fn read_gps(path: &Path) -> Option<GpsFix> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Cannot open {} for EXIF: {}", path.display(), e);
            return None;
        }
    };
    let mut reader = BufReader::new(file);
    match reader.fill_buf() {
        Ok(header) if is_gif(header) => {
            debug!("GIF {} carries no EXIF", path.display());
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Cannot read {} for EXIF: {}", path.display(), e);
            return None;
        }
    }
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            debug!("No EXIF data in {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Failed to read EXIF from {}: {}", path.display(), e);
            return None;
        }
    };

    let fix = GpsTags::from_exif(&exif).to_fix();
    if fix.is_none() {
        debug!("No GPS position in {}", path.display());
    }
    fix
}
