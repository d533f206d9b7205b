//! Successful and denied logins through the full chain.

use nomad_bridge::nomad_auth::provider::WRONG_PASSWORD;
use nomad_bridge::nomad_auth::{AuthenticationResponse, Decision, Rejection};
use nomad_bridge::nomad_core::traits::CredentialStore;

use super::helpers::TestBridge;

#[tokio::test]
async fn test_new_player_is_created_from_remote_login() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": true}"#).await;

    let decision = app.runtime.bridge.authenticate("newplayer", "hunter2").await;

    assert_eq!(decision, Decision::AcceptRemoteAndSync);
    assert_eq!(app.store.len().await, 1);
    assert!(app.stored_password_is("Newplayer", "hunter2").await);
    assert_eq!(app.remote_calls().await, 1);
}

#[tokio::test]
async fn test_chain_passes_new_player_after_sync() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": true}"#).await;

    let response = app.runtime.authenticate("newplayer", "hunter2").await;

    assert_eq!(
        response,
        AuthenticationResponse::Pass {
            username: "Newplayer".to_string()
        }
    );
    assert_eq!(app.remote_calls().await, 1);
}

#[tokio::test]
async fn test_retry_reuses_account_without_remote_call() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": true}"#).await;

    app.runtime.authenticate("newplayer", "hunter2").await;
    let second = app.runtime.authenticate("newplayer", "hunter2").await;

    assert!(matches!(second, AuthenticationResponse::Pass { .. }));
    assert_eq!(app.store.len().await, 1);
    assert_eq!(app.remote_calls().await, 1);
}

#[tokio::test]
async fn test_local_match_never_calls_remote() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": false}"#).await;
    app.seed_account("Oldplayer", "rightpass").await;

    let response = app.runtime.authenticate("oldplayer", "rightpass").await;

    assert_eq!(
        response,
        AuthenticationResponse::Pass {
            username: "Oldplayer".to_string()
        }
    );
    assert_eq!(app.remote_calls().await, 0);
}

#[tokio::test]
async fn test_remote_password_repairs_stale_local_hash() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": true}"#).await;
    app.seed_account("Oldplayer", "oldpass").await;
    let before = app.store.find_by_username("Oldplayer").await.unwrap().unwrap();

    let response = app.runtime.authenticate("Oldplayer", "changed-in-game").await;

    assert!(matches!(response, AuthenticationResponse::Pass { .. }));
    assert!(app.stored_password_is("Oldplayer", "changed-in-game").await);
    let after = app.store.find_by_username("Oldplayer").await.unwrap().unwrap();
    assert_eq!(after.id, before.id);
    assert_ne!(after.token, before.token);
    assert_eq!(app.remote_calls().await, 1);
}

#[tokio::test]
async fn test_old_player_wrong_password_is_rejected_without_mutation() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": false}"#).await;
    app.seed_account("Oldplayer", "rightpass").await;
    let before = app.store.find_by_username("Oldplayer").await.unwrap().unwrap();

    let decision = app.runtime.bridge.authenticate("oldplayer", "wrongpass").await;
    assert_eq!(decision, Decision::Reject(Rejection::RemoteDenied));

    let response = app.runtime.authenticate("oldplayer", "wrongpass").await;
    assert_eq!(response, AuthenticationResponse::fail(WRONG_PASSWORD));

    let after = app.store.find_by_username("Oldplayer").await.unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(app.remote_calls().await, 2);
}

#[tokio::test]
async fn test_policy_violation_surfaces_reason_without_remote_call() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": true}"#).await;

    let response = app.runtime.authenticate("newplayer", "NEWPLAYER").await;

    match response {
        AuthenticationResponse::Fail { message } => {
            assert!(message.contains("different from your username"));
        }
        other => panic!("expected policy failure, got {other:?}"),
    }
    assert_eq!(app.remote_calls().await, 0);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_unusable_username_falls_through_to_generic_failure() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": true}"#).await;

    let response = app.runtime.authenticate("127.0.0.1", "hunter2").await;

    assert_eq!(response, AuthenticationResponse::fail(WRONG_PASSWORD));
    assert_eq!(app.remote_calls().await, 0);
}
