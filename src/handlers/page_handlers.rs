use actix_web::{get, HttpResponse, Responder};

use crate::handlers::ApiError;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// GET /
/// Upload form; its script posts to /analyze and renders the result.
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(INDEX_HTML)
}

pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}

pub async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}
