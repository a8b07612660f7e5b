use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{auth::AppApiUser, models::EnabledResponse, utils::query::parse_bool, AppState};

#[derive(Debug, Deserialize)]
pub struct EnabledQuery {
    pub enabled: Option<String>,
}

/// Add or remove the "Optical Text" entry of the Files app menu.
///
/// A failed registration call is reported in the `error` field of a 200
/// response, which is how the AppAPI expects the toggle to answer.
pub async fn set_enabled(
    State(state): State<Arc<AppState>>,
    _user: AppApiUser,
    Query(query): Query<EnabledQuery>,
) -> Response {
    let value = query.enabled.unwrap_or_default();
    let Some(enabled) = parse_bool(&value) else {
        tracing::warn!("Rejected enabled toggle with value {:?}", value);
        return (StatusCode::BAD_REQUEST, "Invalid boolean value").into_response();
    };

    tracing::info!("Setting files action enabled={}", enabled);
    let result = if enabled {
        state.nextcloud.register_files_action().await
    } else {
        state.nextcloud.unregister_files_action().await
    };

    let error = match result {
        Ok(_) => String::new(),
        Err(e) => {
            tracing::error!("Files action toggle failed: {}", e);
            e.to_string()
        }
    };

    Json(EnabledResponse { error }).into_response()
}
