// src/services/upload_service.rs
use std::path::PathBuf;
use std::sync::LazyLock;

use log::info;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::uploaded_image::StoredUpload;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"));

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFile,
    #[error("unsupported file format")]
    InvalidExtension,
    #[error("file exceeds {0} bytes")]
    TooLarge(usize),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct UploadService {
    pub upload_folder: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub max_content_length: usize,
}

impl UploadService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            upload_folder: config.upload_folder.clone(),
            allowed_extensions: config.allowed_extensions.clone(),
            max_content_length: config.max_content_length,
        }
    }

    /// Lower-cased extension of `filename` if it is on the whitelist.
    pub fn allowed_extension(&self, filename: &str) -> Result<String, UploadError> {
        if filename.is_empty() {
            return Err(UploadError::NoFile);
        }
        let (_, ext) = filename.rsplit_once('.').ok_or(UploadError::InvalidExtension)?;
        let ext = ext.to_ascii_lowercase();
        if self.allowed_extensions.iter().any(|allowed| *allowed == ext) {
            Ok(ext)
        } else {
            Err(UploadError::InvalidExtension)
        }
    }

    pub fn check_size(&self, len: usize) -> Result<(), UploadError> {
        if len > self.max_content_length {
            return Err(UploadError::TooLarge(self.max_content_length));
        }
        Ok(())
    }

    /// Validates, renames and writes an uploaded photo. Nothing touches disk on a validation error.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredUpload, UploadError> {
        let ext = self.allowed_extension(original_name)?;
        self.check_size(bytes.len())?;

        let filename = unique_filename(original_name, &ext);
        let path = self.upload_folder.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        info!("Stored upload {} ({} bytes)", filename, bytes.len());
        Ok(StoredUpload { filename, path })
    }
}

fn unique_filename(original_name: &str, ext: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    let safe = sanitize_filename(original_name);
    let keeps_ext = safe
        .rsplit_once('.')
        .is_some_and(|(stem, e)| !stem.is_empty() && e.eq_ignore_ascii_case(ext));
    if keeps_ext {
        format!("{}_{}", token, safe)
    } else {
        format!("{}.{}", token, ext)
    }
}

/// Strips a client-supplied name down to a flat ASCII filename.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name.chars().filter(|c| c.is_ascii()).collect();
    let flat = ascii.replace(['/', '\\'], " ");
    let joined = flat.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(dir: &std::path::Path) -> UploadService {
        let config = AppConfig {
            upload_folder: dir.to_path_buf(),
            max_content_length: 64,
            ..AppConfig::default()
        };
        UploadService::new(&config)
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let svc = service(std::path::Path::new("unused"));
        assert_eq!(svc.allowed_extension("holiday.JPG").unwrap(), "jpg");
        assert_eq!(svc.allowed_extension("a.b.JpEg").unwrap(), "jpeg");
        assert_eq!(svc.allowed_extension("x.gif").unwrap(), "gif");
    }

    #[test]
    fn extension_check_rejects_others() {
        let svc = service(std::path::Path::new("unused"));
        assert!(matches!(svc.allowed_extension("notes.txt"), Err(UploadError::InvalidExtension)));
        assert!(matches!(svc.allowed_extension("png"), Err(UploadError::InvalidExtension)));
        assert!(matches!(svc.allowed_extension("photo.png.exe"), Err(UploadError::InvalidExtension)));
        assert!(matches!(svc.allowed_extension(""), Err(UploadError::NoFile)));
    }

    #[test]
    fn sanitize_removes_paths_and_unsafe_chars() {
        assert_eq!(sanitize_filename("../../etc/passwd.jpg"), "etc_passwd.jpg");
        assert_eq!(sanitize_filename(r"C:\Users\me\My Photo (1).png"), "C_Users_me_My_Photo_1.png");
        assert_eq!(sanitize_filename("фото.jpg"), "jpg");
        assert_eq!(sanitize_filename("  .hidden.gif "), "hidden.gif");
    }

    #[test]
    fn unique_name_keeps_or_restores_extension() {
        let kept = unique_filename("My Trip.jpeg", "jpeg");
        assert!(kept.ends_with("_My_Trip.jpeg"));
        assert_eq!(kept.len(), 32 + 1 + "My_Trip.jpeg".len());

        let restored = unique_filename("фото.jpg", "jpg");
        assert!(restored.ends_with(".jpg"));
        assert_eq!(restored.len(), 32 + ".jpg".len());
    }

    #[tokio::test]
    async fn same_name_twice_gives_two_files() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());

        let first = svc.store("photo.png", b"one").await.unwrap();
        let second = svc.store("photo.png", b"two").await.unwrap();

        assert_ne!(first.filename, second.filename);
        assert_eq!(std::fs::read(&first.path).unwrap(), b"one");
        assert_eq!(std::fs::read(&second.path).unwrap(), b"two");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn rejected_upload_writes_nothing() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());

        assert!(matches!(svc.store("notes.txt", b"hi").await, Err(UploadError::InvalidExtension)));
        assert!(matches!(svc.store("big.png", &[0u8; 65]).await, Err(UploadError::TooLarge(64))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
