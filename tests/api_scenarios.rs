//! End-to-end scenarios against a running service.

use std::sync::Arc;

use reqwest::StatusCode;
use face_auth_sdk::AuthClient;
use serde_json::{json, Value};

mod common;

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn test_status_reports_running() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;
    let client = common::http_client();

    let res = client
        .get(format!("{}/api/status", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_cors(&res);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"status": "running"}));

    let sdk = AuthClient::new(&server.url());
    assert_eq!(sdk.status().await.unwrap().status, "running");

    server.stop().await;
}

#[tokio::test]
async fn test_preflight_returns_headers_only() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;
    let client = common::http_client();

    let res = client
        .request(reqwest::Method::OPTIONS, format!("{}/anything", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_cors(&res);
    assert!(res.text().await.unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_unmatched_route_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;
    let client = common::http_client();

    for res in [
        client.get(format!("{}/api/login", server.url())).send().await.unwrap(),
        client.get(format!("{}/", server.url())).send().await.unwrap(),
        client.put(format!("{}/api/register", server.url())).send().await.unwrap(),
    ] {
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_cors(&res);
        assert!(res.text().await.unwrap().is_empty());
    }

    server.stop().await;
}

#[tokio::test]
async fn test_register_duplicate_and_login() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;
    let client = common::http_client();
    let body = json!({"username": "alice", "faceData": "abc"});

    let res = client
        .post(format!("{}/api/register", server.url()))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_cors(&res);
    let registered: Value = res.json().await.unwrap();
    assert_eq!(registered["success"], true);
    assert_eq!(registered["message"], "User registered successfully");
    assert_eq!(registered["user"]["username"], "alice");
    let id = registered["user"]["id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let duplicate: Value = client
        .post(format!("{}/api/register", server.url()))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        duplicate,
        json!({"success": false, "message": "Username already exists"})
    );

    let sdk = AuthClient::new(&server.url());
    let login = sdk.login("alice", "abc").await.unwrap();
    assert!(login.success);
    assert_eq!(login.message, "Authentication successful");
    assert_eq!(login.user.unwrap().id, id);

    server.stop().await;
}

#[tokio::test]
async fn test_login_unknown_user() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;
    let client = common::http_client();

    let res: Value = client
        .post(format!("{}/api/login", server.url()))
        .json(&json!({"username": "bob", "faceData": "x"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res, json!({"success": false, "message": "User not found"}));

    server.stop().await;
}

#[tokio::test]
async fn test_bad_bodies_are_answered_in_band() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;
    let client = common::http_client();

    let res = client
        .post(format!("{}/api/register", server.url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let value: Value = res.json().await.unwrap();
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed request body"));

    let sdk = AuthClient::new(&server.url());
    let missing = sdk.register("", "abc").await.unwrap();
    assert!(!missing.success);
    assert_eq!(missing.message, "Username and face data required");
    assert!(missing.user.is_none());

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config(dir.path());
    config.security.max_body_size = 64;
    let server = common::start_with_config(config).await;
    let client = common::http_client();

    let res = client
        .post(format!("{}/api/register", server.url()))
        .json(&json!({"username": "alice", "faceData": "x".repeat(1024)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_cors(&res);

    let sdk = AuthClient::new(&server.url());
    assert!(!sdk.login("alice", "x").await.unwrap().success);

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_admit_one() {
    const CALLERS: usize = 20;
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;
    let sdk = Arc::new(AuthClient::new(&server.url()));

    let tasks: Vec<_> = (0..CALLERS)
        .map(|i| {
            let sdk = Arc::clone(&sdk);
            tokio::spawn(async move {
                sdk.register("carol", &format!("face-{i}"))
                    .await
                    .map_err(|e| e.to_string())
            })
        })
        .collect();

    let mut successes = 0;
    let mut duplicates = 0;
    for task in tasks {
        let res = task.await.unwrap().unwrap();
        if res.success {
            successes += 1;
        } else if res.message == "Username already exists" {
            duplicates += 1;
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(duplicates, CALLERS - 1);

    server.stop().await;
}
