use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::models::FileActionInfo;

use super::pipeline::{OcrPipeline, TaskError, TaskOutcome};

/// Runs each accepted callback as its own detached tokio task.
///
/// There is no completion channel back to the platform, so the outcome of a
/// task only ends up in the logs.
#[derive(Clone)]
pub struct OcrDispatcher {
    pipeline: Arc<OcrPipeline>,
}

impl OcrDispatcher {
    pub fn new(pipeline: Arc<OcrPipeline>) -> Self {
        Self { pipeline }
    }

    /// Start a task for `info` acting as `user_name`. Callers that do not
    /// care about the result can drop the handle; the task keeps running.
    pub fn dispatch(
        &self,
        user_name: String,
        info: FileActionInfo,
    ) -> JoinHandle<Result<TaskOutcome, TaskError>> {
        let task_id = Uuid::new_v4();
        let span = info_span!(
            "ocr_task",
            %task_id,
            user = %user_name,
            file_id = info.file_id,
            name = %info.name
        );
        let pipeline = self.pipeline.clone();

        tokio::spawn(
            async move {
                info!("OCR task started");
                let result = pipeline.run(&user_name, &info).await;
                match &result {
                    Ok(outcome) if outcome.degraded => {
                        warn!("OCR task finished with empty text for {}", outcome.source_path)
                    }
                    Ok(outcome) => info!(
                        "OCR task finished: {} bytes of text written to {}",
                        outcome.text_len, outcome.result_path
                    ),
                    Err(e) => error!("OCR task failed: {}", e),
                }
                result
            }
            .instrument(span),
        )
    }
}
