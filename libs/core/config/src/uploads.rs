use crate::{env_or_default, env_parse_or, ConfigError, FromEnv};
use std::path::PathBuf;

/// 2 MiB, the largest image accepted by the upload form.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Where uploaded images are written and the URL prefix they are served under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    /// Content directory on disk
    pub dir: PathBuf,
    /// Public path prefix for stored references, always starting with '/'
    pub public_prefix: String,
    /// Largest accepted image payload
    pub max_bytes: usize,
}

impl UploadConfig {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: normalize_prefix(public_prefix),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::new("public/uploads", "/uploads")
    }
}

impl FromEnv for UploadConfig {
    /// - UPLOAD_DIR: defaults to public/uploads
    /// - UPLOAD_PUBLIC_PREFIX: defaults to /uploads
    /// - UPLOAD_MAX_BYTES: defaults to 2097152
    fn from_env() -> Result<Self, ConfigError> {
        let dir = env_or_default("UPLOAD_DIR", "public/uploads");
        let prefix = env_or_default("UPLOAD_PUBLIC_PREFIX", "/uploads");
        let max_bytes = env_parse_or("UPLOAD_MAX_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        if max_bytes == 0 {
            return Err(ConfigError::ParseError {
                key: "UPLOAD_MAX_BYTES".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self::new(dir, &prefix).with_max_bytes(max_bytes))
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    format!("/{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_config_defaults() {
        temp_env::with_vars(
            [
                ("UPLOAD_DIR", None::<&str>),
                ("UPLOAD_PUBLIC_PREFIX", None::<&str>),
                ("UPLOAD_MAX_BYTES", None::<&str>),
            ],
            || {
                let config = UploadConfig::from_env().unwrap();
                assert_eq!(config, UploadConfig::default());
                assert_eq!(config.max_bytes, 2_097_152);
                assert_eq!(config.public_prefix, "/uploads");
            },
        );
    }

    #[test]
    fn test_upload_config_normalizes_prefix() {
        temp_env::with_vars(
            [
                ("UPLOAD_DIR", Some("/var/lib/catalog/images")),
                ("UPLOAD_PUBLIC_PREFIX", Some("media/images/")),
                ("UPLOAD_MAX_BYTES", None::<&str>),
            ],
            || {
                let config = UploadConfig::from_env().unwrap();
                assert_eq!(config.dir, PathBuf::from("/var/lib/catalog/images"));
                assert_eq!(config.public_prefix, "/media/images");
            },
        );
    }

    #[test]
    fn test_upload_config_rejects_bad_limit() {
        temp_env::with_var("UPLOAD_MAX_BYTES", Some("lots"), || {
            let err = UploadConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("UPLOAD_MAX_BYTES"));
        });

        temp_env::with_var("UPLOAD_MAX_BYTES", Some("0"), || {
            assert!(UploadConfig::from_env().is_err());
        });
    }
}
