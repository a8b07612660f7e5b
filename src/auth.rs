use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::{config::Config, AppState};

pub const APP_ID_HEADER: &str = "EX-APP-ID";
pub const APP_VERSION_HEADER: &str = "EX-APP-VERSION";
pub const APP_API_AUTH_HEADER: &str = "AUTHORIZATION-APP-API";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid app id: {0}")]
    IdentityMismatch(String),

    #[error("invalid app version: {0}")]
    VersionMismatch(String),

    #[error("failed to decode credential: {0}")]
    DecodeError(String),

    #[error("credential is not in user:secret form")]
    MalformedCredential,

    #[error("invalid app secret")]
    SecretMismatch,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!("Rejected callback: {}", self);
        (StatusCode::UNAUTHORIZED, "Invalid signature").into_response()
    }
}

/// Check the app id, version and shared secret declared by a caller and
/// return the user name embedded in the credential.
pub fn verify_credentials(
    config: &Config,
    app_id: &str,
    app_version: &str,
    credential: &str,
) -> Result<String, AuthError> {
    if app_id != config.app_id {
        return Err(AuthError::IdentityMismatch(app_id.to_string()));
    }
    if app_version != config.app_version {
        return Err(AuthError::VersionMismatch(app_version.to_string()));
    }

    let decoded = STANDARD
        .decode(credential)
        .map_err(|e| AuthError::DecodeError(e.to_string()))?;

    // Compared as raw bytes; the user name need not be valid UTF-8
    let separator = decoded
        .iter()
        .position(|&b| b == b':')
        .ok_or(AuthError::MalformedCredential)?;
    let (user_name, secret) = (&decoded[..separator], &decoded[separator + 1..]);
    if secret != config.app_secret.as_bytes() {
        return Err(AuthError::SecretMismatch);
    }

    Ok(String::from_utf8_lossy(user_name).into_owned())
}

/// Same as [`verify_credentials`], reading the values from request headers.
/// Absent headers compare as empty strings.
pub fn verify_headers(config: &Config, headers: &HeaderMap) -> Result<String, AuthError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    };

    verify_credentials(
        config,
        header(APP_ID_HEADER),
        header(APP_VERSION_HEADER),
        header(APP_API_AUTH_HEADER),
    )
}

/// Build the credential header value that lets the platform act as `user_name`.
pub fn encode_credential(user_name: &str, secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", user_name, secret))
}

/// Extractor for the user a verified callback acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppApiUser(pub String);

impl FromRequestParts<Arc<AppState>> for AppApiUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        verify_headers(&state.config, &parts.headers).map(AppApiUser)
    }
}
