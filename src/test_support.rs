//! Image and request fixtures built in memory for tests.

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

pub const BOUNDARY: &str = "----photolocator-test-boundary";

pub struct GpsSample {
    pub lat: [(u32, u32); 3],
    pub lat_ref: &'static str,
    pub lon: [(u32, u32); 3],
    pub lon_ref: &'static str,
    pub altitude: (u32, u32),
}

impl GpsSample {
    /// 55°45'30.0"N 37°37'3.6"E, 144 m.
    pub fn moscow() -> Self {
        Self {
            lat: [(55, 1), (45, 1), (300, 10)],
            lat_ref: "N",
            lon: [(37, 1), (37, 1), (36, 10)],
            lon_ref: "E",
            altitude: (144, 1),
        }
    }
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

pub fn plain_jpeg() -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(RgbImage::new(8, 6)), ImageFormat::Jpeg)
}

pub fn plain_png() -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(RgbImage::new(4, 3)), ImageFormat::Png)
}

pub fn plain_gif() -> Vec<u8> {
    encode(DynamicImage::ImageRgba8(RgbaImage::new(5, 2)), ImageFormat::Gif)
}

fn rationals(parts: &[(u32, u32)]) -> Value {
    Value::Rational(parts.iter().map(|&(num, denom)| Rational { num, denom }).collect())
}

fn ascii(s: &str) -> Value {
    Value::Ascii(vec![s.as_bytes().to_vec()])
}

/// TIFF-structured EXIF block holding the sample's GPS tags.
fn gps_tiff(sample: &GpsSample) -> Vec<u8> {
    let field = |tag, value| Field { tag, ifd_num: In::PRIMARY, value };
    let fields = [
        field(Tag::Orientation, Value::Short(vec![1])),
        field(Tag::GPSLatitudeRef, ascii(sample.lat_ref)),
        field(Tag::GPSLatitude, rationals(&sample.lat)),
        field(Tag::GPSLongitudeRef, ascii(sample.lon_ref)),
        field(Tag::GPSLongitude, rationals(&sample.lon)),
        field(Tag::GPSAltitude, rationals(&[sample.altitude])),
    ];

    let mut writer = Writer::new();
    for f in &fields {
        writer.push_field(f);
    }
    let mut out = Cursor::new(Vec::new());
    writer.write(&mut out, false).unwrap();
    out.into_inner()
}

/// 8x6 JPEG with an APP1 EXIF segment inserted right after SOI.
pub fn jpeg_with_gps(sample: &GpsSample) -> Vec<u8> {
    let jpeg = plain_jpeg();
    let tiff = gps_tiff(sample);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    let segment_len = u16::try_from(payload.len() + 2).unwrap();

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Single-part multipart body. `filename = None` sends a plain form field.
pub fn multipart_body(field: &str, filename: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };
    let mut body = format!(
        "--{}\r\nContent-Disposition: {}\r\nContent-Type: application/octet-stream\r\n\r\n",
        BOUNDARY, disposition
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
