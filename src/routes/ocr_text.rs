use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{auth::AppApiUser, models::FileActionInfo, AppState};

/// Action handler for the "Optical Text" menu entry.
///
/// Answers 200 as soon as the payload parses and leaves the work to a
/// detached task; the platform never learns the outcome.
pub async fn ocr_text(
    State(state): State<Arc<AppState>>,
    AppApiUser(user_name): AppApiUser,
    body: Bytes,
) -> Response {
    let info: FileActionInfo = match serde_json::from_slice(&body) {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!("Failed to parse file action payload: {}", e);
            return (StatusCode::BAD_REQUEST, "Failed to parse JSON").into_response();
        }
    };

    tracing::info!("OCR requested by {} for {} in {}", user_name, info.name, info.directory);
    state.dispatcher.dispatch(user_name, info);

    StatusCode::OK.into_response()
}
