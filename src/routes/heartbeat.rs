use axum::Json;

use crate::models::HeartbeatResponse;

pub async fn heartbeat() -> Json<HeartbeatResponse> {
    tracing::debug!("Heartbeat requested");
    Json(HeartbeatResponse::ok())
}
