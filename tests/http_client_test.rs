// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HTTP Client Tests
 * Tests for status pass-through, JSON submission, client header and transport errors
 *
 * @copyright 2025 Bountyy Oy
 * @license Proprietary
 */

use raysentry_scanner::errors::ErrorCategory;
use raysentry_scanner::http_client::{HttpClient, HttpClientOptions, HttpTransport};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client() -> HttpClient {
    HttpClient::new(Duration::from_secs(5)).unwrap()
}

/// A port nothing listens on
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_http_client_get_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/jobs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/jobs/", &mock_server.uri());
    let response = client().get(&url).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "[]");
}

#[tokio::test]
async fn test_http_client_error_statuses_are_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = client();
    let missing = client
        .get(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap();
    let broken = client
        .get(&format!("{}/broken", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(missing.status_code, 404);
    assert_eq!(broken.status_code, 500);
}

#[tokio::test]
async fn test_http_client_post_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/jobs/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "entrypoint": "echo hi" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "job_id": "42", "submission_id": "s-1" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/jobs/", &mock_server.uri());
    let response = client()
        .post_json(&url, &json!({ "entrypoint": "echo hi" }))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["job_id"], "42");
}

#[tokio::test]
async fn test_http_client_identifying_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("X-Scanner-Client", "raysentry/test"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_options(HttpClientOptions {
        timeout: Duration::from_secs(5),
        client_header: Some(("X-Scanner-Client".to_string(), "raysentry/test".to_string())),
        accept_invalid_certs: false,
    })
    .unwrap();

    let response = client.get(&mock_server.uri()).await.unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_http_client_does_not_follow_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/jobs/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/login"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/jobs/", &mock_server.uri());
    let response = client().get(&url).await.unwrap();

    assert_eq!(response.status_code, 302);
    assert_eq!(response.header("location").as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_http_client_connection_refused() {
    let url = format!("http://127.0.0.1:{}/api/jobs/", closed_port());
    let err = client().get(&url).await.unwrap_err();

    assert!(err.is_connection_refused());
    assert_eq!(err.category(), ErrorCategory::ConnectivityError);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_http_client_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(Duration::from_millis(200)).unwrap();
    let err = client.get(&mock_server.uri()).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.category(), ErrorCategory::ConnectivityError);
}

#[tokio::test]
async fn test_http_client_dns_failure() {
    // .invalid is reserved and never resolves
    let err = client()
        .get("http://ray-head.invalid:8265/api/jobs/")
        .await
        .unwrap_err();

    assert!(err.is_dns_failure(), "unexpected error: {}", err);
    assert_eq!(err.category(), ErrorCategory::ConnectivityError);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_http_client_caps_body_size() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a".repeat(3 * 1024 * 1024)))
        .mount(&mock_server)
        .await;

    let response = client().get(&mock_server.uri()).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.len(), 1024 * 1024);
}
