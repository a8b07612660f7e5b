use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ocr_text::{config::Config, create_app, staging::StagingArea, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    StagingArea::new(config.temp_dir.clone())
        .initialize()
        .await
        .context("failed to prepare staging directory")?;

    let address = config.bind_address();
    let state = Arc::new(AppState::from_config(config));
    let app = create_app(state.clone());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    info!(
        "Serving {} {} on {} (Nextcloud at {})",
        state.config.app_id,
        state.config.app_version,
        address,
        state.config.nextcloud_url
    );
    axum::serve(listener, app).await?;

    Ok(())
}
