// src/main.rs
mod config;
mod dtos;
mod handlers;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::{DefaultHeaders, ErrorHandlers, Logger};
use actix_web::{web, App, HttpServer};
use log::{error, info};

use crate::config::{mask_key, AppConfig};
use crate::handlers::{configure_routes, json_server_error};
use crate::handlers::page_handlers::not_found;
use crate::services::upload_service::UploadService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub uploads: UploadService,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let default_filter = if config::debug_from_env() { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    std::fs::create_dir_all(&config.upload_folder)?;

    info!("Upload folder: {}", config.upload_folder.display());
    info!("Upload limit: {} bytes", config.max_content_length);
    info!("Metadata backend: {}", config.metadata_backend);
    info!("Secret key: {}", mask_key(&config.secret_key));
    if config.debug {
        info!("Debug mode enabled");
    }

    let bind_address = format!("0.0.0.0:{}", config.port);
    let allowed_origins = config.allowed_origins.clone();
    let state = web::Data::new(AppState {
        uploads: UploadService::new(&config),
        config,
    });

    info!("Starting PhotoLocator on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["content-type", "accept", "x-requested-with"])
            .max_age(3600);

        if allowed_origins.is_empty() {
            cors = cors.allow_any_origin();
        }
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        let no_cache = DefaultHeaders::new()
            .add((header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, max-age=0"))
            .add((header::PRAGMA, "no-cache"))
            .add((header::EXPIRES, "-1"));

        App::new()
            .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, json_server_error))
            .wrap(no_cache)
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure_routes)
            .default_service(web::to(not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}
