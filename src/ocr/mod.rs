pub mod dispatch;
pub mod engine;
pub mod error;
pub mod pipeline;

use async_trait::async_trait;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::ocr::error::OcrError;

pub use dispatch::OcrDispatcher;
pub use pipeline::{OcrPipeline, TaskError, TaskOutcome};

/// Text recognition over an image stored on local disk
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine identifier used in logs
    fn name(&self) -> &'static str;

    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError>;
}

/// What a task does when the recognizer itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionPolicy {
    /// Store an empty result and finish the task
    #[default]
    SubstituteEmpty,
    /// Stop the task without storing anything
    Abort,
}

impl FromStr for RecognitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substitute-empty" | "best-effort" => Ok(Self::SubstituteEmpty),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown recognition policy: {}", other)),
        }
    }
}

/// Recognizer selected for this build: libtesseract when the `ocr` feature
/// is compiled in, the tesseract executable otherwise.
pub fn engine_from_config(config: &Config) -> Arc<dyn OcrEngine> {
    #[cfg(feature = "ocr")]
    {
        Arc::new(engine::TesseractEngine::new(config.ocr_language.clone()))
    }

    #[cfg(not(feature = "ocr"))]
    {
        Arc::new(engine::TesseractCliEngine::new(
            config.tesseract_path.clone(),
            config.ocr_language.clone(),
        ))
    }
}
