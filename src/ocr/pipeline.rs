//! Download, recognize and upload for a single Files-app selection.
//!
//! Steps run strictly in order: acquire staging, fetch, stage, recognize,
//! store. A fetch, stage or store failure ends the task; the staging file is
//! released on every path. Nothing is retried and nothing already written to
//! the remote side is rolled back.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::FileActionInfo;
use crate::ocr::error::OcrError;
use crate::ocr::{OcrEngine, RecognitionPolicy};
use crate::services::nextcloud::{GatewayError, RemoteFileGateway};
use crate::staging::{StagingArea, StagingError, StagingFile};
use crate::utils::paths::{extract_extension, result_dav_path, source_dav_path};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("could not create staging file: {0}")]
    StagingUnavailable(#[source] StagingError),

    #[error("failed to fetch {path}: {source}")]
    FetchFailed {
        path: String,
        #[source]
        source: GatewayError,
    },

    #[error("failed to stage {path}: {source}")]
    StageWriteFailed {
        path: String,
        #[source]
        source: StagingError,
    },

    #[error("recognition of {path} failed: {source}")]
    Recognition {
        path: String,
        #[source]
        source: OcrError,
    },

    #[error("failed to store {path}: {source}")]
    StoreFailed {
        path: String,
        #[source]
        source: GatewayError,
    },
}

/// Summary of a finished task, used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub source_path: String,
    pub result_path: String,
    pub text_len: usize,
    /// Recognition failed and an empty result was stored instead
    pub degraded: bool,
}

pub struct OcrPipeline {
    gateway: Arc<dyn RemoteFileGateway>,
    engine: Arc<dyn OcrEngine>,
    staging: StagingArea,
    policy: RecognitionPolicy,
}

impl OcrPipeline {
    pub fn new(
        gateway: Arc<dyn RemoteFileGateway>,
        engine: Arc<dyn OcrEngine>,
        staging: StagingArea,
        policy: RecognitionPolicy,
    ) -> Self {
        Self {
            gateway,
            engine,
            staging,
            policy,
        }
    }

    /// Recognize the text of `info` on behalf of `user_name` and store it
    /// next to the image as a `.txt` file.
    pub async fn run(&self, user_name: &str, info: &FileActionInfo) -> Result<TaskOutcome, TaskError> {
        let source_path = source_dav_path(user_name, &info.directory, &info.name);
        let result_path = result_dav_path(&source_path);
        debug!("OCR {} -> {}", source_path, result_path);

        let staged = self
            .staging
            .acquire(extract_extension(&source_path))
            .await
            .map_err(TaskError::StagingUnavailable)?;

        let outcome = self.process(&staged, user_name, source_path, result_path).await;

        if let Err(e) = staged.release().await {
            warn!("{}", e);
        }
        outcome
    }

    async fn process(
        &self,
        staged: &StagingFile,
        user_name: &str,
        source_path: String,
        result_path: String,
    ) -> Result<TaskOutcome, TaskError> {
        let fetched = self.gateway.fetch(&source_path, user_name).await;
        let data = match fetched {
            Ok(data) => data,
            Err(source) => return Err(TaskError::FetchFailed { path: source_path, source }),
        };
        debug!("Fetched {} bytes from {}", data.len(), source_path);

        let written = staged.write_all(&data).await;
        if let Err(source) = written {
            return Err(TaskError::StageWriteFailed { path: source_path, source });
        }
        drop(data);

        let recognized = self.engine.recognize(staged.path()).await;
        let (text, degraded) = match recognized {
            Ok(text) => (text, false),
            Err(source) => match self.policy {
                RecognitionPolicy::SubstituteEmpty => {
                    warn!(
                        "{} could not read {}: {}; storing empty text",
                        self.engine.name(),
                        source_path,
                        source
                    );
                    (String::new(), true)
                }
                RecognitionPolicy::Abort => {
                    return Err(TaskError::Recognition { path: source_path, source });
                }
            },
        };

        let text_len = text.len();
        let stored = self.gateway.store(&result_path, user_name, text.into_bytes()).await;
        if let Err(source) = stored {
            return Err(TaskError::StoreFailed { path: result_path, source });
        }

        info!("Stored {} bytes of text at {}", text_len, result_path);
        Ok(TaskOutcome {
            source_path,
            result_path,
            text_len,
            degraded,
        })
    }
}
