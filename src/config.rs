use std::path::PathBuf;

use crate::ocr::RecognitionPolicy;

/// Default language handed to tesseract when `OCR_LANGUAGE` is not set
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub app_id: String,
    pub app_version: String,
    pub app_secret: String,
    /// Nextcloud root with `/index.php` and the trailing slash removed
    pub nextcloud_url: String,
    pub temp_dir: PathBuf,
    pub ocr_language: String,
    pub tesseract_path: String,
    pub recognition_policy: RecognitionPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("APP_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "APP_PORT", value })?,
            None => 10070,
        };

        let recognition_policy = match lookup("OCR_FAILURE_POLICY") {
            Some(value) => value
                .parse::<RecognitionPolicy>()
                .map_err(|_| ConfigError::Invalid { name: "OCR_FAILURE_POLICY", value })?,
            None => RecognitionPolicy::default(),
        };

        Ok(Self {
            host,
            port,
            app_id: required("APP_ID")?,
            app_version: required("APP_VERSION")?,
            app_secret: required("APP_SECRET")?,
            nextcloud_url: normalize_nextcloud_url(&required("NEXTCLOUD_URL")?),
            temp_dir: lookup("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            ocr_language: lookup("OCR_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.to_string()),
            tesseract_path: lookup("TESSERACT_PATH").unwrap_or_else(|| "tesseract".to_string()),
            recognition_policy,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Strip a trailing `/index.php` and then a trailing slash.
pub fn normalize_nextcloud_url(url: &str) -> String {
    let url = url.strip_suffix("/index.php").unwrap_or(url);
    url.strip_suffix('/').unwrap_or(url).to_string()
}
