pub mod auth;
pub mod config;
pub mod models;
pub mod ocr;
pub mod routes;
pub mod services;
pub mod staging;
pub mod test_helpers;
pub mod utils;


use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use config::Config;
use ocr::{OcrDispatcher, OcrEngine, OcrPipeline};
use services::nextcloud::{NextcloudClient, RemoteFileGateway};
use staging::StagingArea;

pub struct AppState {
    pub config: Config,
    pub nextcloud: NextcloudClient,
    pub dispatcher: OcrDispatcher,
}

impl AppState {
    /// Wire the production collaborators: the Nextcloud client serves as the
    /// file gateway and the recognizer is picked from the build features.
    pub fn from_config(config: Config) -> Self {
        let nextcloud = NextcloudClient::new(&config);
        let gateway: Arc<dyn RemoteFileGateway> = Arc::new(nextcloud.clone());
        let engine = ocr::engine_from_config(&config);
        Self::with_collaborators(config, nextcloud, gateway, engine)
    }

    pub fn with_collaborators(
        config: Config,
        nextcloud: NextcloudClient,
        gateway: Arc<dyn RemoteFileGateway>,
        engine: Arc<dyn OcrEngine>,
    ) -> Self {
        let staging = StagingArea::new(config.temp_dir.clone());
        let pipeline = OcrPipeline::new(gateway, engine, staging, config.recognition_policy);

        Self {
            config,
            nextcloud,
            dispatcher: OcrDispatcher::new(Arc::new(pipeline)),
        }
    }
}

/// Full HTTP application with request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
