//! ClerkClient against a mock Backend API.

use std::time::Duration;

use serde_json::json;
use usersync_core::{ProviderMetadataClient, ProviderMetadataPatch, PublicMetadata, SyncError};
use usersync_provider_clerk::{ClerkClient, ClerkConfig};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ClerkClient {
    ClerkClient::new(ClerkConfig::new("sk_test_secret").with_api_url(server.uri())).unwrap()
}

fn patch(provider_user_id: &str, local_id: &str) -> ProviderMetadataPatch {
    ProviderMetadataPatch {
        provider_user_id: provider_user_id.to_string(),
        public_metadata: PublicMetadata {
            user_id: local_id.to_string(),
        },
    }
}

#[tokio::test]
async fn test_patches_public_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/user_2abc/metadata"))
        .and(header("authorization", "Bearer sk_test_secret"))
        .and(body_json(json!({"public_metadata": {"userId": "local_1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "user_2abc"})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update_public_metadata(&patch("user_2abc", "local_1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_not_found_maps_to_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/user_gone/metadata"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{
                "message": "not found",
                "long_message": "No user was found with id user_gone",
                "code": "resource_not_found"
            }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_public_metadata(&patch("user_gone", "local_1"))
        .await
        .unwrap_err();

    match err {
        SyncError::ProviderError { status, ref message } => {
            assert_eq!(status, Some(404));
            assert!(message.contains("No user was found"));
        }
        other => panic!("expected ProviderError, got {other:?}"),
    }
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn test_server_error_maps_to_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_public_metadata(&patch("user_2abc", "local_1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::ProviderError { status: Some(503), .. }));
}

#[tokio::test]
async fn test_timeout_maps_to_provider_error_without_status() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = ClerkClient::new(
        ClerkConfig::new("sk_test_secret")
            .with_api_url(server.uri())
            .with_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let err = client
        .update_public_metadata(&patch("user_2abc", "local_1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::ProviderError { status: None, .. }));
}

#[tokio::test]
async fn test_unsafe_id_never_reaches_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_public_metadata(&patch("../admin", "local_1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::InvalidField { .. }));
}
