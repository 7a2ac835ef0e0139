pub mod analyze_handlers;
pub mod health_handlers;
pub mod page_handlers;

use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{web, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::dtos::analyze_dtos::ErrorResponse;
use crate::services::upload_service::UploadError;

const NO_FILE_MESSAGE: &str = "No file selected";
const BAD_EXTENSION_MESSAGE: &str = "Unsupported file format. Use JPG, PNG or GIF";

/// Every failure a route can answer with. Rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("File is too large")]
    PayloadTooLarge,
    #[error("Failed to process the image")]
    Processing,
    #[error("Page not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal server error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Processing | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::NoFile => ApiError::BadRequest(NO_FILE_MESSAGE.to_string()),
            UploadError::InvalidExtension => ApiError::BadRequest(BAD_EXTENSION_MESSAGE.to_string()),
            UploadError::TooLarge(_) => ApiError::PayloadTooLarge,
            UploadError::Io(e) => {
                error!("Failed to write upload: {}", e);
                ApiError::Internal
            }
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(page_handlers::index)
        .service(health_handlers::health)
        .service(analyze_handlers::analyze_photo)
        .service(web::resource("/analyze").to(page_handlers::method_not_allowed));
}

/// Replaces any 500 body that is not already `{"error": ...}` JSON.
pub fn json_server_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .response()
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    error!("Unhandled server error on {}", res.request().path());
    let (req, _) = res.into_parts();
    let response = ServiceResponse::new(req, ApiError::Internal.error_response());
    Ok(ErrorHandlerResponse::Response(response.map_into_right_body()))
}
