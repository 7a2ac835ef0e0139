// src/handlers/analyze_handlers.rs
use actix_multipart::Multipart;
use actix_web::{post, web, HttpRequest, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};

use crate::dtos::analyze_dtos::AnalyzeResponse;
use crate::handlers::ApiError;
use crate::models::geo_location::GeoLocation;
use crate::services::exif_service::{self, DecodeError};
use crate::services::upload_service::UploadError;
use crate::AppState;

const PHOTO_FIELD: &str = "photo";

struct PhotoUpload {
    filename: String,
    bytes: Vec<u8>,
}

/// POST /analyze
/// Store the `photo` field, read its size and GPS position, answer with a location.
#[post("/analyze")]
pub async fn analyze_photo(
    req: HttpRequest,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    if let Some(len) = content_length(&req) {
        state.uploads.check_size(len)?;
    }

    let upload = read_photo_field(&mut payload, state.uploads.max_content_length).await?;
    let stored = state.uploads.store(&upload.filename, &upload.bytes).await?;

    let backend = state.config.metadata_backend;
    let path = stored.path.clone();
    let (image_info, fix) = web::block(move || -> Result<_, DecodeError> {
        let info = exif_service::inspect_image(&path)?;
        Ok((info, backend.locate(&path)))
    })
    .await
    .map_err(|e| {
        error!("Blocking task for {} failed: {}", stored.filename, e);
        ApiError::Internal
    })?
    .map_err(|e| {
        error!("Cannot decode {}: {}", stored.filename, e);
        ApiError::Processing
    })?;

    let location = GeoLocation::resolve(fix);
    info!(
        "Analyzed {} ({}x{} {}), location source {:?}",
        stored.filename, image_info.width, image_info.height, image_info.format, location.source
    );

    let map_url = location.map_url();
    Ok(HttpResponse::Ok().json(AnalyzeResponse {
        success: true,
        filename: stored.filename,
        image_info,
        location,
        map_url,
    }))
}

fn content_length(req: &HttpRequest) -> Option<usize> {
    req.headers()
        .get(actix_web::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Drains the multipart body until the `photo` file field is found.
/// Every byte read counts against `limit`, including skipped fields.
async fn read_photo_field(payload: &mut Multipart, limit: usize) -> Result<PhotoUpload, ApiError> {
    let mut total = 0usize;
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(UploadError::NoFile.into()),
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return Err(UploadError::NoFile.into());
            }
        };

        let is_photo = field.name() == Some(PHOTO_FIELD);
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|name| name.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                warn!("Upload stream broke off: {}", e);
                ApiError::BadRequest("Upload was interrupted".to_string())
            })?;
            total += chunk.len();
            if total > limit {
                return Err(UploadError::TooLarge(limit).into());
            }
            if is_photo {
                bytes.extend_from_slice(&chunk);
            }
        }

        if is_photo {
            return match filename {
                Some(filename) if !filename.is_empty() => Ok(PhotoUpload { filename, bytes }),
                _ => Err(UploadError::NoFile.into()),
            };
        }
    }
}
