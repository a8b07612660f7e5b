use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub mod enabled;
pub mod heartbeat;
pub mod ocr_text;

/// Endpoints the AppAPI calls on this service. Requests with any other
/// method are answered 405 by the router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/heartbeat", get(heartbeat::heartbeat))
        .route("/enabled", put(enabled::set_enabled))
        .route(crate::models::OCR_ACTION_HANDLER, post(ocr_text::ocr_text))
}
