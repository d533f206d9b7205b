//! Desert Nomad auth bridge
//!
//! Wires configuration, the account store, the remote client and the
//! provider chain together for a host that embeds the bridge in its login
//! path. The host calls [`bootstrap`] once at startup and then
//! [`BridgeRuntime::authenticate`] for each login form submission.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use nomad_auth::{
    AuthBridge, AuthenticationChain, AuthenticationResponse, DesertNomadProvider,
    LocalPasswordProvider, PasswordPolicy,
};
use nomad_core::config::{BridgeConfig, LoggingConfig};
use nomad_core::error::AppError;
use nomad_core::result::AppResult;
use nomad_core::traits::CredentialStore;
use nomad_core::types::CredentialAttempt;
use nomad_database::{MemoryCredentialStore, open_account_store};

pub use nomad_auth;
pub use nomad_core;
pub use nomad_database;

/// Everything a host needs to authenticate logins through the bridge.
#[derive(Clone)]
pub struct BridgeRuntime {
    /// The bridge itself, for hosts that drive it directly.
    pub bridge: Arc<AuthBridge>,
    /// Bridge followed by the local password check.
    pub chain: AuthenticationChain,
    /// The store both providers share.
    pub store: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for BridgeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeRuntime")
            .field("bridge", &self.bridge)
            .field("chain", &self.chain)
            .finish()
    }
}

impl BridgeRuntime {
    /// Builds the runtime over an existing store.
    pub fn new(config: &BridgeConfig, store: Arc<dyn CredentialStore>) -> AppResult<Self> {
        let bridge = Arc::new(AuthBridge::from_config(config, store.clone())?);
        let policy = PasswordPolicy::new(&config.policy);

        let chain = AuthenticationChain::new()
            .with_provider(Arc::new(DesertNomadProvider::new(bridge.clone())))
            .with_provider(Arc::new(LocalPasswordProvider::new(store.clone(), policy)));
        chain.validate()?;

        info!(providers = ?chain.provider_ids(), "Authentication chain ready");
        Ok(Self {
            bridge,
            chain,
            store,
        })
    }

    /// Runs one login through the full chain.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthenticationResponse {
        self.chain
            .authenticate(&CredentialAttempt::new(username, password))
            .await
    }
}

/// Connects the configured store and builds the runtime.
///
/// Uses PostgreSQL when `[database]` is configured, the in-memory store
/// otherwise.
pub async fn bootstrap(config: &BridgeConfig) -> AppResult<BridgeRuntime> {
    config.validate()?;

    let store: Arc<dyn CredentialStore> = match &config.database {
        Some(db_config) => Arc::new(open_account_store(db_config).await?),
        None => {
            warn!("No [database] configured; accounts are kept in memory only");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    BridgeRuntime::new(config, store)
}

/// Installs the global tracing subscriber.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.map_err(|e| AppError::internal(format!("Failed to install tracing subscriber: {e}")))
}
