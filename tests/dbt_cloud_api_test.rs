//! Integration tests for DbtCloudClient over real HTTP.
//!
//! Uses wiremock to stand in for dbt Cloud. Tests cover request paths,
//! headers and bodies, the no-request guarantee for missing identifiers, and
//! how non-2xx and non-JSON responses surface.

use dbt_cloud_client::{ClientConfig, ClientError, DbtCloudClient, TriggerRunRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer, account_id: Option<&str>) -> DbtCloudClient {
    let mut config = ClientConfig::new("test-token")
        .with_base_api_url(format!("{}/api", mock_server.uri()))
        .with_timeout_ms(5_000);
    config.account_id = account_id.map(str::to_string);
    DbtCloudClient::new(config).expect("failed to create client")
}

#[tokio::test]
async fn test_trigger_job_run_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/accounts/123/jobs/456/run"))
        .and(header("authorization", "Token test-token"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({"cause": "nightly"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"code": 200, "is_success": true},
            "data": {"id": 42, "job_definition_id": 456, "status": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let data = json!({"cause": "nightly"});
    let run_id = client
        .trigger_job_run(456, data.as_object())
        .await
        .expect("trigger failed");

    assert_eq!(run_id, 42);
}

#[tokio::test]
async fn test_trigger_job_run_typed_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/accounts/123/jobs/456/run"))
        .and(body_json(json!({
            "cause": "PR check",
            "github_pull_request_id": 88,
            "schema_override": "dbt_pr_88"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "9001"}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let request = TriggerRunRequest::with_cause("PR check")
        .github_pull_request_id(88)
        .schema_override("dbt_pr_88");

    let run_id = client
        .trigger_job_run_with("456", &request)
        .await
        .expect("trigger failed");
    assert_eq!(run_id, 9001);
}

#[tokio::test]
async fn test_trigger_job_run_without_account_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 1}})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, None);
    let result = client.trigger_job_run(456, None).await;

    assert!(matches!(result, Err(ClientError::InvalidCredentials(_))));
}

#[tokio::test]
async fn test_get_run_status_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/accounts/123/runs/42"))
        .and(header("authorization", "Token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"code": 200},
            "data": {
                "id": 42,
                "status": 10,
                "status_humanized": "Success",
                "is_complete": true,
                "is_success": true
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let status = client.get_run_status(42).await.expect("status failed");

    assert_eq!(status.id(), Some(42));
    assert_eq!(status.status(), Some(10));
    assert_eq!(status.status_humanized(), Some("Success"));
    assert_eq!(status.is_complete(), Some(true));
    assert!(status.get("status_humanized").is_some());
}

#[tokio::test]
async fn test_get_run_status_without_run_id_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let result = client.get_run_status("").await;

    match result {
        Err(ClientError::InvalidCredentials(message)) => {
            assert_eq!(
                message,
                "account_id and run_id are required, got account_id: 123 and run_id: ."
            );
        }
        other => panic!("expected InvalidCredentials, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_endpoint_passes_body_through() {
    let mock_server = MockServer::start().await;
    let body = json!({
        "status": {"code": 200},
        "data": [{"id": 1, "name": "Nightly"}, {"id": 2, "name": "Hourly"}],
        "extra": {"pagination": {"count": 2, "total_count": 2}}
    });

    Mock::given(method("GET"))
        .and(path("/api/v2/accounts/123/jobs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let response = client
        .get_endpoint("accounts/123/jobs/")
        .await
        .expect("get failed");

    assert_eq!(response, body);
}

#[tokio::test]
async fn test_post_endpoint_passes_body_through() {
    let mock_server = MockServer::start().await;
    let body = json!({"data": {"ok": true, "values": [1, 2, 3]}});

    Mock::given(method("POST"))
        .and(path("/api/v2/accounts/123/runs/42/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let response = client
        .post_endpoint("accounts/123/runs/42/cancel", None)
        .await
        .expect("post failed");

    assert_eq!(response, body);
}

#[tokio::test]
async fn test_api_error_status_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/accounts/123/runs/42"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": {"code": 401, "is_success": false, "user_message": "Invalid token"},
            "data": null
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let result = client.get_run_status(42).await;

    match result {
        Err(ClientError::ApiError { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid token"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_recoverable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let err = client.trigger_job_run(456, None).await.unwrap_err();

    assert!(matches!(err, ClientError::ApiError { status: 503, .. }));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_non_json_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("123"));
    let result = client.get_endpoint("accounts/123").await;

    assert!(matches!(result, Err(ClientError::SerializationError(_))));
}

#[tokio::test]
async fn test_connection_failure_is_http_error() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);

    let config = ClientConfig::new("test-token")
        .with_account_id("123")
        .with_base_api_url(format!("http://127.0.0.1:{}/api", port))
        .with_timeout_ms(5_000);
    let client = DbtCloudClient::new(config).expect("failed to create client");

    let err = client.get_run_status(42).await.unwrap_err();
    assert!(matches!(err, ClientError::HttpError(_)), "got {:?}", err);
    assert!(err.is_recoverable());
}
