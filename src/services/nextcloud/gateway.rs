use async_trait::async_trait;

use super::client::{GatewayError, NextcloudClient};

/// Per-user read and write of single files on the platform's storage
#[async_trait]
pub trait RemoteFileGateway: Send + Sync {
    async fn fetch(&self, dav_path: &str, user_name: &str) -> Result<Vec<u8>, GatewayError>;

    async fn store(&self, dav_path: &str, user_name: &str, data: Vec<u8>) -> Result<(), GatewayError>;
}

#[async_trait]
impl RemoteFileGateway for NextcloudClient {
    async fn fetch(&self, dav_path: &str, user_name: &str) -> Result<Vec<u8>, GatewayError> {
        self.download(dav_path, user_name).await
    }

    async fn store(&self, dav_path: &str, user_name: &str, data: Vec<u8>) -> Result<(), GatewayError> {
        self.upload(dav_path, user_name, data).await
    }
}
