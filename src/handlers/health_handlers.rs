use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;

use crate::dtos::analyze_dtos::HealthResponse;

pub const SERVICE_NAME: &str = "PhotoLocator";

/// GET /health
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}
