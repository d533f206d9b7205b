//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nomad_bridge::BridgeRuntime;
use nomad_bridge::nomad_auth::PasswordHasher;
use nomad_bridge::nomad_core::config::BridgeConfig;
use nomad_bridge::nomad_database::MemoryCredentialStore;

/// A runtime wired to an in-memory store and a mock remote server.
pub struct TestBridge {
    /// Mock Desert Nomad endpoint.
    pub server: MockServer,
    /// The store both providers share.
    pub store: Arc<MemoryCredentialStore>,
    /// The wired runtime.
    pub runtime: BridgeRuntime,
}

impl TestBridge {
    /// Start a mock server and wire a runtime with the given timeout.
    pub async fn with_timeout(timeout_seconds: u64) -> Self {
        let server = MockServer::start().await;

        let mut config = BridgeConfig::default();
        config.remote.endpoint = format!("{}/login", server.uri());
        config.remote.allow_insecure_http = true;
        config.remote.timeout_seconds = timeout_seconds;

        let store = Arc::new(MemoryCredentialStore::new());
        let runtime =
            BridgeRuntime::new(&config, store.clone()).expect("Failed to build bridge runtime");

        Self {
            server,
            store,
            runtime,
        }
    }

    /// Start with the default five second timeout.
    pub async fn new() -> Self {
        Self::with_timeout(5).await
    }

    /// Make the remote answer every login with `status` and `body`.
    pub async fn remote_responds(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Make the remote answer `{"Result": true}` only after `delay`.
    pub async fn remote_hangs(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"Result": true}"#, "application/json")
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Number of requests the remote has received.
    pub async fn remote_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Seed a local account with a real hash of `password`.
    pub async fn seed_account(&self, username: &str, password: &str) {
        let hash = hash(password);
        self.store.seed(username, &hash).await;
    }

    /// Whether the stored hash for `username` verifies `password`.
    pub async fn stored_password_is(&self, username: &str, password: &str) -> bool {
        use nomad_bridge::nomad_core::traits::CredentialStore;

        match self.store.find_by_username(username).await {
            Ok(Some(account)) => PasswordHasher::new()
                .verify_password(password, &account.password_hash)
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Hash a password the way the bridge does.
pub fn hash(password: &str) -> String {
    PasswordHasher::new()
        .hash_password(password)
        .expect("Failed to hash password")
}
