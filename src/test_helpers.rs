/*!
 * Test Helpers and Utilities
 *
 * Builders for configurations and application state with test defaults.
 * Tests can modify the returned objects as needed.
 */

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::{
    config::Config,
    ocr::{error::OcrError, OcrEngine, RecognitionPolicy},
    services::nextcloud::{GatewayError, NextcloudClient, RemoteFileGateway},
    AppState,
};

pub const TEST_APP_ID: &str = "ocr_text";
pub const TEST_APP_VERSION: &str = "1.0.0";
pub const TEST_APP_SECRET: &str = "s3cret";

/// Creates a test configuration pointing at `nextcloud_url`
/// All fields are populated so new fields show up here as compile errors
pub fn create_test_config(nextcloud_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        app_id: TEST_APP_ID.to_string(),
        app_version: TEST_APP_VERSION.to_string(),
        app_secret: TEST_APP_SECRET.to_string(),
        nextcloud_url: nextcloud_url.to_string(),
        temp_dir: std::env::temp_dir(),
        ocr_language: "eng".to_string(),
        tesseract_path: "tesseract".to_string(),
        recognition_policy: RecognitionPolicy::SubstituteEmpty,
    }
}

/// Creates application state with the given gateway and recognizer.
/// The Nextcloud client used by the enable toggle talks to `config.nextcloud_url`.
pub fn create_test_state(
    config: Config,
    gateway: Arc<dyn RemoteFileGateway>,
    engine: Arc<dyn OcrEngine>,
) -> Arc<AppState> {
    let nextcloud = NextcloudClient::new(&config);
    Arc::new(AppState::with_collaborators(config, nextcloud, gateway, engine))
}

/// URL of a local port nothing listens on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// A file written through [`RecordingGateway::store`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: String,
    pub user_name: String,
    pub data: Vec<u8>,
}

/// In-memory file gateway that records every call.
#[derive(Default)]
pub struct RecordingGateway {
    files: Mutex<HashMap<String, Vec<u8>>>,
    fetches: Mutex<Vec<(String, String)>>,
    stores: Mutex<Vec<StoredFile>>,
    fail_fetch: bool,
    fail_store: bool,
    fetch_gate: Option<Arc<Notify>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, data: &[u8]) -> Self {
        self.files.lock().unwrap().insert(path.to_string(), data.to_vec());
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn failing_store(mut self) -> Self {
        self.fail_store = true;
        self
    }

    /// Hold every fetch until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    pub fn fetches(&self) -> Vec<(String, String)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn stores(&self) -> Vec<StoredFile> {
        self.stores.lock().unwrap().clone()
    }

    fn unavailable(path: &str) -> GatewayError {
        GatewayError::Status {
            url: path.to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "unavailable".to_string(),
        }
    }
}

#[async_trait]
impl RemoteFileGateway for RecordingGateway {
    async fn fetch(&self, dav_path: &str, user_name: &str) -> Result<Vec<u8>, GatewayError> {
        self.fetches
            .lock()
            .unwrap()
            .push((dav_path.to_string(), user_name.to_string()));

        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        if self.fail_fetch {
            return Err(Self::unavailable(dav_path));
        }

        Ok(self.files.lock().unwrap().get(dav_path).cloned().unwrap_or_default())
    }

    async fn store(&self, dav_path: &str, user_name: &str, data: Vec<u8>) -> Result<(), GatewayError> {
        if self.fail_store {
            return Err(Self::unavailable(dav_path));
        }

        self.stores.lock().unwrap().push(StoredFile {
            path: dav_path.to_string(),
            user_name: user_name.to_string(),
            data,
        });
        Ok(())
    }
}

/// Recognizer returning a fixed result and recording what it was shown.
pub struct StaticEngine {
    result: Result<String, String>,
    seen: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl StaticEngine {
    pub fn returning(text: &str) -> Self {
        Self { result: Ok(text.to_string()), seen: Mutex::new(Vec::new()) }
    }

    pub fn failing(details: &str) -> Self {
        Self { result: Err(details.to_string()), seen: Mutex::new(Vec::new()) }
    }

    /// Staged paths and their contents at recognition time
    pub fn seen(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrEngine for StaticEngine {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let data = tokio::fs::read(image_path).await?;
        self.seen.lock().unwrap().push((image_path.to_path_buf(), data));

        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(details) => Err(OcrError::ExtractionFailed { details: details.clone() }),
        }
    }
}
