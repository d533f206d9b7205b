//! The remote failing in every way must look exactly like a denial.

use std::time::Duration;

use nomad_bridge::nomad_auth::provider::WRONG_PASSWORD;
use nomad_bridge::nomad_auth::{AuthenticationResponse, Decision, Rejection};
use nomad_bridge::nomad_core::traits::CredentialStore;

use super::helpers::TestBridge;

#[tokio::test]
async fn test_malformed_answers_are_treated_as_denial() {
    let cases = [
        (200, "{}", Rejection::RemoteProtocol),
        (200, "not json", Rejection::RemoteProtocol),
        (200, r#"{"Result": "yes"}"#, Rejection::RemoteProtocol),
        (200, r#"{"Result": 1}"#, Rejection::RemoteProtocol),
        (200, "[true]", Rejection::RemoteProtocol),
        (200, "[false]", Rejection::RemoteProtocol),
        (200, "true", Rejection::RemoteProtocol),
        (500, r#"{"Result": true}"#, Rejection::RemoteUnavailable),
        (403, "", Rejection::RemoteUnavailable),
    ];

    for (status, body, expected) in cases {
        let app = TestBridge::new().await;
        app.remote_responds(status, body).await;

        let decision = app.runtime.bridge.authenticate("newplayer", "hunter2").await;
        assert_eq!(decision, Decision::Reject(expected), "{status} {body}");

        let response = app.runtime.authenticate("newplayer", "hunter2").await;
        assert_eq!(response, AuthenticationResponse::fail(WRONG_PASSWORD), "{status} {body}");
        assert!(app.store.is_empty().await, "{status} {body}");
    }
}

#[tokio::test]
async fn test_malformed_answer_leaves_existing_account_untouched() {
    let app = TestBridge::new().await;
    app.remote_responds(200, r#"{"Result": "true"}"#).await;
    app.seed_account("Oldplayer", "rightpass").await;
    let before = app.store.find_by_username("Oldplayer").await.unwrap().unwrap();

    let response = app.runtime.authenticate("Oldplayer", "anything").await;

    assert_eq!(response, AuthenticationResponse::fail(WRONG_PASSWORD));
    let after = app.store.find_by_username("Oldplayer").await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_timeout_rejects_and_creates_nothing() {
    let app = TestBridge::with_timeout(1).await;
    app.remote_hangs(Duration::from_secs(3)).await;

    let decision = app.runtime.bridge.authenticate("newplayer", "hunter2").await;

    assert_eq!(decision, Decision::Reject(Rejection::RemoteUnavailable));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_array_answer_cannot_repair_existing_account() {
    let app = TestBridge::new().await;
    app.remote_responds(200, "[true]").await;
    app.seed_account("Oldplayer", "rightpass").await;

    let decision = app.runtime.bridge.authenticate("Oldplayer", "attackerpass").await;
    assert_eq!(decision, Decision::Reject(Rejection::RemoteProtocol));

    let response = app.runtime.authenticate("Oldplayer", "attackerpass").await;
    assert_eq!(response, AuthenticationResponse::fail(WRONG_PASSWORD));
    assert!(app.stored_password_is("Oldplayer", "rightpass").await);
    assert!(!app.stored_password_is("Oldplayer", "attackerpass").await);
}

#[tokio::test]
async fn test_oversized_answer_is_treated_as_denial() {
    let app = TestBridge::new().await;
    let body = serde_json::json!({
        "Result": true,
        "Motd": "x".repeat(64 * 1024),
    })
    .to_string();
    app.remote_responds(200, &body).await;

    let decision = app.runtime.bridge.authenticate("newplayer", "hunter2").await;

    assert_eq!(decision, Decision::Reject(Rejection::RemoteProtocol));
    assert!(app.store.is_empty().await);
}
