//! Registry durability across restarts.

use face_auth::lifecycle::{self, StartupError};
use face_auth::registry::store::OpenError;
use face_auth::registry::LockError;
use face_auth_sdk::AuthClient;

mod common;

#[tokio::test]
async fn test_registrations_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let server = common::start_server(dir.path()).await;
    let sdk = AuthClient::new(&server.url());
    let registered = sdk.register("alice", "abc").await.unwrap();
    assert!(registered.success);
    server.stop().await;

    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("users.json")).unwrap()).unwrap();
    assert_eq!(on_disk["users"]["alice"]["face_data"], "abc");
    assert_eq!(
        on_disk["users"]["alice"]["id"],
        registered.user.as_ref().unwrap().id.as_str()
    );

    let server = common::start_server(dir.path()).await;
    let sdk = AuthClient::new(&server.url());
    let login = sdk.login("alice", "abc").await.unwrap();
    assert!(login.success);
    assert_eq!(login.user, registered.user);

    let duplicate = sdk.register("alice", "abc").await.unwrap();
    assert!(!duplicate.success);
    server.stop().await;
}

#[tokio::test]
async fn test_corrupt_registry_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("users.json"), "{\"users\": [oops").unwrap();

    let server = common::start_server(dir.path()).await;
    let sdk = AuthClient::new(&server.url());

    assert_eq!(sdk.status().await.unwrap().status, "running");
    assert_eq!(sdk.login("alice", "abc").await.unwrap().message, "User not found");
    assert!(sdk.register("alice", "abc").await.unwrap().success);
    server.stop().await;

    let repaired = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
    assert!(repaired.starts_with("{\"users\":{\"alice\""));
}

#[tokio::test]
async fn test_fresh_data_dir_is_initialized() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("server").join("data");

    let server = common::start_server(&data_dir).await;
    assert_eq!(
        std::fs::read_to_string(data_dir.join("users.json")).unwrap(),
        r#"{"users":{}}"#
    );
    server.stop().await;
}

#[tokio::test]
async fn test_second_instance_on_same_data_dir_refused() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(dir.path()).await;

    let result = lifecycle::prepare(common::test_config(dir.path())).await;
    assert!(matches!(
        result,
        Err(StartupError::Store(OpenError::Lock(LockError::AlreadyLocked(_))))
    ));

    server.stop().await;
}
