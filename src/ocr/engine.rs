use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::OcrError;
use super::OcrEngine;

#[cfg(feature = "ocr")]
use tesseract::Tesseract;

/// Runs the `tesseract` executable and reads the text from its stdout.
#[derive(Debug, Clone)]
pub struct TesseractCliEngine {
    executable: String,
    language: String,
}

impl TesseractCliEngine {
    pub fn new(executable: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            language: language.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractCliEngine {
    fn name(&self) -> &'static str {
        "tesseract-cli"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        debug!("Running {} on {}", self.executable, image_path.display());

        let output = Command::new(&self.executable)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::TesseractNotInstalled,
                _ => OcrError::Io(e),
            })?;

        if !output.status.success() {
            return Err(OcrError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// In-process recognition through libtesseract, run on the blocking pool.
#[cfg(feature = "ocr")]
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
}

#[cfg(feature = "ocr")]
impl TesseractEngine {
    pub fn new(language: impl Into<String>) -> Self {
        Self { language: language.into() }
    }
}

#[cfg(feature = "ocr")]
#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let path = image_path
            .to_str()
            .ok_or_else(|| OcrError::InvalidImage {
                path: image_path.display().to_string(),
                details: "path is not valid UTF-8".to_string(),
            })?
            .to_string();
        let language = self.language.clone();

        tokio::task::spawn_blocking(move || {
            let mut tesseract = Tesseract::new(None, Some(language.as_str()))
                .map_err(|e| OcrError::InitializationFailed { details: e.to_string() })?
                .set_image(&path)
                .map_err(|e| OcrError::InvalidImage { path: path.clone(), details: e.to_string() })?;

            let text = tesseract
                .get_text()
                .map_err(|e| OcrError::ExtractionFailed { details: e.to_string() })?;

            Ok(text.trim().to_string())
        })
        .await
        .map_err(|e| OcrError::ExtractionFailed { details: e.to_string() })?
    }
}
