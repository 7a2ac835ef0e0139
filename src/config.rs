use std::env;
use std::path::PathBuf;
use anyhow::{bail, Context, Result};

use crate::services::locator::MetadataBackend;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SECRET_KEY: &str = "dev-key-change-in-production";
const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;
const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Settings read once at startup and shared read-only with every worker.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub debug: bool,
    pub secret_key: String,
    pub upload_folder: PathBuf,
    pub max_content_length: usize,
    pub allowed_extensions: Vec<String>,
    pub metadata_backend: MetadataBackend,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            debug: false,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            upload_folder: PathBuf::from(DEFAULT_UPLOAD_FOLDER),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            metadata_backend: MetadataBackend::Exif,
            allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port) = lookup("PORT") {
            cfg.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", port))?;
        }

        cfg.debug = lookup("DEBUG").map(|v| parse_flag(&v)).unwrap_or(false);

        if let Some(key) = lookup("SECRET_KEY").filter(|k| !k.trim().is_empty()) {
            cfg.secret_key = key.trim().to_string();
        }

        if let Some(folder) = lookup("UPLOAD_FOLDER").filter(|f| !f.trim().is_empty()) {
            cfg.upload_folder = PathBuf::from(folder.trim());
        }

        if let Some(limit) = lookup("MAX_CONTENT_LENGTH") {
            cfg.max_content_length = limit
                .trim()
                .parse()
                .with_context(|| format!("MAX_CONTENT_LENGTH is not a byte count: {}", limit))?;
            if cfg.max_content_length == 0 {
                bail!("MAX_CONTENT_LENGTH must be greater than zero");
            }
        }

        if let Some(backend) = lookup("METADATA_BACKEND") {
            cfg.metadata_backend = backend.parse()?;
        }

        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            cfg.allowed_origins = origins
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
        }

        Ok(cfg)
    }
}

/// Only reads `DEBUG`, so the logger can be set up before the rest of the config is parsed.
pub fn debug_from_env() -> bool {
    env::var("DEBUG").map(|v| parse_flag(&v)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

pub fn mask_key(k: &str) -> String {
    let chars: Vec<char> = k.chars().collect();
    if chars.len() <= 8 { return "[REDACTED]".to_string(); }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
