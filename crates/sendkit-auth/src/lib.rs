//! Wallet authentication collaborator.
//!
//! Defines the `AuthProvider` trait the auth panel drives, plus a
//! `MockAuthProvider` for tests and local runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sendkit_types::{Result, SendkitError};

pub mod config;
pub mod panel;

pub use config::AuthConfig;
pub use panel::{AuthActivity, AuthPanel, AuthPanelView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Passkey,
    Wallet,
    Email,
}

/// Which wallet chains the login dialog offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainFilter {
    EthereumOnly,
    #[default]
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOptions {
    pub methods: Vec<LoginMethod>,
    pub chain_filter: ChainFilter,
}

impl LoginOptions {
    /// Wallet login restricted to Ethereum wallets.
    pub fn ethereum_wallet() -> Self {
        Self {
            methods: vec![LoginMethod::Wallet],
            chain_filter: ChainFilter::EthereumOnly,
        }
    }
}

/// Provider-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub login_methods: Vec<LoginMethod>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            login_methods: vec![LoginMethod::Passkey, LoginMethod::Wallet, LoginMethod::Email],
        }
    }
}

/// Authentication capability.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn is_ready(&self) -> bool;
    fn is_authenticated(&self) -> bool;
    async fn login(&self, options: &LoginOptions) -> Result<()>;
    async fn logout(&self) -> Result<()>;
}

/// In-memory provider that accepts any enabled login method.
pub struct MockAuthProvider {
    config: ProviderConfig,
    ready: AtomicBool,
    authenticated: AtomicBool,
    logout_latency: Duration,
    last_login: Mutex<Option<LoginOptions>>,
}

impl MockAuthProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            ready: AtomicBool::new(true),
            authenticated: AtomicBool::new(false),
            logout_latency: Duration::ZERO,
            last_login: Mutex::new(None),
        }
    }

    pub fn with_logout_latency(mut self, latency: Duration) -> Self {
        self.logout_latency = latency;
        self
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Options passed to the most recent successful login.
    pub fn last_login(&self) -> Option<LoginOptions> {
        self.last_login.lock().unwrap().clone()
    }
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn login(&self, options: &LoginOptions) -> Result<()> {
        if !self.is_ready() {
            return Err(SendkitError::Auth("provider is not ready".into()));
        }
        if let Some(method) = options
            .methods
            .iter()
            .find(|m| !self.config.login_methods.contains(*m))
        {
            return Err(SendkitError::Auth(format!("login method {:?} is not enabled", method)));
        }
        *self.last_login.lock().unwrap() = Some(options.clone());
        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        tokio::time::sleep(self.logout_latency).await;
        self.authenticated.store(false, Ordering::SeqCst);
        Ok(())
    }
}
