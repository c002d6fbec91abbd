//! Image ingestion: validation and persistence of uploaded product images.

use async_trait::async_trait;
use bytes::Bytes;
use core_config::uploads::UploadConfig;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::error::{ProductError, ProductResult};

const FALLBACK_FILE_NAME: &str = "upload";

/// A file part taken from the product form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Browsers submit an unnamed, empty part when no file was chosen.
    pub fn is_empty_selection(&self) -> bool {
        self.file_name.trim().is_empty() && self.bytes.is_empty()
    }
}

/// Image persistence seam.
///
/// `store` returns the public reference of the written file. `discard` takes
/// such a reference back and removes the file, tolerating one that is already gone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, upload: ImageUpload) -> ProductResult<String>;

    async fn discard(&self, reference: &str) -> ProductResult<()>;
}

/// Content directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    config: UploadConfig,
}

impl LocalImageStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Path on disk for a reference produced by `store`, if it belongs here.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let prefix = self.public_prefix();
        let file_name = reference.strip_prefix(prefix)?.strip_prefix('/')?;
        if file_name.is_empty() || sanitize_file_name(file_name) != file_name {
            return None;
        }
        Some(self.config.dir.join(file_name))
    }

    fn public_prefix(&self) -> &str {
        self.config.public_prefix.trim_end_matches('/')
    }

    fn validate(&self, upload: &ImageUpload) -> ProductResult<()> {
        if upload.bytes.len() > self.config.max_bytes {
            return Err(ProductError::InvalidImage(format!(
                "image is {} bytes, the limit is {} bytes",
                upload.bytes.len(),
                self.config.max_bytes
            )));
        }

        let is_image = upload
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(ProductError::InvalidImage(format!(
                "unsupported content type '{}'",
                upload.content_type.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> ProductResult<String> {
        self.validate(&upload)?;

        tokio::fs::create_dir_all(&self.config.dir).await?;

        let file_name = format!("{}_{}", epoch_millis(), sanitize_file_name(&upload.file_name));
        let path = self.config.dir.join(&file_name);
        tokio::fs::write(&path, &upload.bytes).await?;

        debug!(path = %path.display(), size = upload.bytes.len(), "Stored image");
        Ok(format!("{}/{}", self.public_prefix(), file_name))
    }

    async fn discard(&self, reference: &str) -> ProductResult<()> {
        let Some(path) = self.resolve(reference) else {
            warn!(reference, "Refusing to discard a reference outside the content directory");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Final path component only, with anything outside `[A-Za-z0-9._-]` as `_`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        sanitized
    }
}
