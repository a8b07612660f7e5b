use serde_json::json;
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::client::{GatewayError, NextcloudClient};
use super::gateway::RemoteFileGateway;
use crate::auth::encode_credential;
use crate::test_helpers::{create_test_config, unreachable_url};

async fn client_for(server: &MockServer) -> NextcloudClient {
    NextcloudClient::new(&create_test_config(&server.uri()))
}

#[tokio::test]
async fn test_fetch_sends_app_api_headers_for_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/remote.php/dav/files/alice/photos/scan.jpg"))
        .and(header("EX-APP-ID", "ocr_text"))
        .and(header("EX-APP-VERSION", "1.0.0"))
        .and(header("OCS-APIRequest", "true"))
        .and(header("AUTHORIZATION-APP-API", encode_credential("alice", "s3cret").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG image".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let data = client.fetch("/files/alice/photos/scan.jpg", "alice").await.unwrap();

    assert_eq!(data, b"\x89PNG image");
}

#[tokio::test]
async fn test_store_puts_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/remote.php/dav/files/bob/scan.txt"))
        .and(header("AUTHORIZATION-APP-API", encode_credential("bob", "s3cret").as_str()))
        .and(body_bytes(b"recognized text".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .store("/files/bob/scan.txt", "bob", b"recognized text".to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_status_body_is_returned_as_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<d:error>not found</d:error>"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let data = client.fetch("/files/alice/missing.png", "alice").await.unwrap();
    assert_eq!(data, b"<d:error>not found</d:error>");

    assert!(client.store("/files/alice/missing.txt", "alice", Vec::new()).await.is_ok());
}

#[tokio::test]
async fn test_transport_failure_is_an_error() {
    let client = NextcloudClient::new(&create_test_config(&unreachable_url()));

    let result = client.fetch("/files/alice/scan.jpg", "alice").await;
    assert!(matches!(result, Err(GatewayError::Transport { .. })));

    let result = client.store("/files/alice/scan.txt", "alice", b"x".to_vec()).await;
    assert!(matches!(result, Err(GatewayError::Transport { .. })));
}

#[tokio::test]
async fn test_register_files_action_posts_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ocs/v1.php/apps/app_api/api/v1/ui/files-actions-menu"))
        .and(header("Content-Type", "application/json"))
        .and(header("AUTHORIZATION-APP-API", encode_credential("", "s3cret").as_str()))
        .and(body_json(json!({
            "name": "ocr_text",
            "displayName": "Optical Text",
            "mime": "image/png, image/jpeg",
            "permissions": 31,
            "actionHandler": "/ocr_text"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ocs\":{}}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let body = client.register_files_action().await.unwrap();
    assert_eq!(body, "{\"ocs\":{}}");
}

#[tokio::test]
async fn test_unregister_files_action_deletes_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/ocs/v1.php/apps/app_api/api/v1/ui/files-actions-menu"))
        .and(body_json(json!({ "name": "ocr_text" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.unregister_files_action().await.unwrap();
}

#[tokio::test]
async fn test_ocs_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.register_files_action().await {
        Err(GatewayError::Status { status, body, .. }) => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_root_url_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/remote.php/dav/files/alice/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.nextcloud_url = crate::config::normalize_nextcloud_url(&format!("{}/index.php", server.uri()));
    let client = NextcloudClient::new(&config);

    assert_eq!(client.root_url(), server.uri());
    assert_eq!(client.fetch("/files/alice/a.png", "alice").await.unwrap(), b"ok");
}

#[tokio::test]
async fn test_reserved_characters_in_names_reach_the_named_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/remote.php/dav/files/alice/receipt%20%233.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.fetch("/files/alice/receipt #3.jpg", "alice").await.unwrap(), b"jpeg");
    client.store("/files/alice/receipt #3.txt", "alice", b"a".to_vec()).await.unwrap();
    client.store("/files/alice/what?/50%.txt", "alice", b"b".to_vec()).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let targets: Vec<(String, Option<String>)> = received
        .iter()
        .map(|r| (r.url.path().to_string(), r.url.query().map(str::to_string)))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("/remote.php/dav/files/alice/receipt%20%233.jpg".to_string(), None),
            ("/remote.php/dav/files/alice/receipt%20%233.txt".to_string(), None),
            ("/remote.php/dav/files/alice/what%3F/50%25.txt".to_string(), None),
        ]
    );
    assert_eq!(received[2].body, b"b");
}
