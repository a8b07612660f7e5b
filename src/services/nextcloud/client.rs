use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::{encode_credential, APP_API_AUTH_HEADER, APP_ID_HEADER, APP_VERSION_HEADER};
use crate::config::Config;
use crate::models::{FilesActionMenu, FilesActionMenuRemoval, OCR_ACTION_NAME};

use super::common::{build_user_agent, dav_url};

/// OCS endpoint managing entries of the Files app action menu
pub const FILES_ACTIONS_MENU_PATH: &str = "/ocs/v1.php/apps/app_api/api/v1/ui/files-actions-menu";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer to an OCS call; DAV calls never produce it
    #[error("{url} answered HTTP {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
}

/// Client for the AppAPI-authenticated endpoints of one Nextcloud instance.
///
/// Every request carries the app id, app version and an
/// `AUTHORIZATION-APP-API` credential naming the user the call acts for.
#[derive(Debug, Clone)]
pub struct NextcloudClient {
    client: Client,
    root_url: String,
    app_id: String,
    app_version: String,
    app_secret: String,
}

impl NextcloudClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            root_url: config.nextcloud_url.clone(),
            app_id: config.app_id.clone(),
            app_version: config.app_version.clone(),
            app_secret: config.app_secret.clone(),
        }
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    fn app_api_request(&self, method: Method, url: &str, user_name: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("User-Agent", build_user_agent())
            .header(APP_ID_HEADER, &self.app_id)
            .header(APP_VERSION_HEADER, &self.app_version)
            .header("OCS-APIRequest", "true")
            .header(APP_API_AUTH_HEADER, encode_credential(user_name, &self.app_secret))
    }

    /// Issue a WebDAV request as `user_name` and return the raw response body.
    ///
    /// The status code is not inspected: an error page from the server comes
    /// back as the body. Only transport failures are errors.
    pub async fn dav_call(
        &self,
        method: Method,
        dav_path: &str,
        user_name: &str,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, GatewayError> {
        let url = dav_url(&self.root_url, dav_path);
        debug!("DAV {} {} as {}", method, url, user_name);

        let response = self
            .app_api_request(method.clone(), &url, user_name)
            .body(data)
            .send()
            .await
            .map_err(|source| GatewayError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            warn!("DAV {} {} answered HTTP {}, using the body as is", method, url, status);
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Body { url, source })?;
        Ok(body.to_vec())
    }

    pub async fn download(&self, dav_path: &str, user_name: &str) -> Result<Vec<u8>, GatewayError> {
        self.dav_call(Method::GET, dav_path, user_name, Vec::new()).await
    }

    pub async fn upload(
        &self,
        dav_path: &str,
        user_name: &str,
        data: Vec<u8>,
    ) -> Result<(), GatewayError> {
        self.dav_call(Method::PUT, dav_path, user_name, data).await.map(|_| ())
    }

    /// Send a JSON payload to an OCS endpoint and return the response text.
    /// Unlike DAV calls, a non-2xx answer is an error here.
    pub async fn ocs_call<T: Serialize + ?Sized>(
        &self,
        method: Method,
        ocs_path: &str,
        user_name: &str,
        payload: &T,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.root_url, ocs_path);
        debug!("OCS {} {}", method, url);

        let response = self
            .app_api_request(method, &url, user_name)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|source| GatewayError::Transport { url: url.clone(), source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GatewayError::Body { url: url.clone(), source })?;

        if !status.is_success() {
            return Err(GatewayError::Status { url, status, body });
        }
        Ok(body)
    }

    /// Show the "Optical Text" entry in the Files app action menu
    pub async fn register_files_action(&self) -> Result<String, GatewayError> {
        self.ocs_call(Method::POST, FILES_ACTIONS_MENU_PATH, "", &FilesActionMenu::ocr_text())
            .await
    }

    /// Remove the entry added by [`register_files_action`](Self::register_files_action)
    pub async fn unregister_files_action(&self) -> Result<String, GatewayError> {
        let payload = FilesActionMenuRemoval { name: OCR_ACTION_NAME.to_string() };
        self.ocs_call(Method::DELETE, FILES_ACTIONS_MENU_PATH, "", &payload).await
    }
}
