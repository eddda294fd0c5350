//! Environment configuration.
//!
//! - `SENDKIT_AUTH_APP_ID`: optional; authentication is disabled without it
//! - `SENDKIT_CHAIN_ID`: required
//! - `SENDKIT_RPC_URL`: required, must be a valid URL
//! - `SENDKIT_PAYMASTER_ADDRESS`: required

use sendkit_types::{Result, SendkitError};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub app_id: Option<String>,
    pub chain_id: String,
    pub rpc_url: Url,
    pub paymaster_address: String,
}

impl AuthConfig {
    pub const APP_ID_VAR: &'static str = "SENDKIT_AUTH_APP_ID";
    pub const CHAIN_ID_VAR: &'static str = "SENDKIT_CHAIN_ID";
    pub const RPC_URL_VAR: &'static str = "SENDKIT_RPC_URL";
    pub const PAYMASTER_ADDRESS_VAR: &'static str = "SENDKIT_PAYMASTER_ADDRESS";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (environment, map in tests).
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            non_empty(key).ok_or_else(|| SendkitError::Config(format!("{} is required", key)))
        };

        let rpc_url = required(Self::RPC_URL_VAR)?;
        let rpc_url = Url::parse(rpc_url.trim()).map_err(|e| {
            SendkitError::Config(format!("{} must be a valid URL: {}", Self::RPC_URL_VAR, e))
        })?;

        Ok(Self {
            app_id: non_empty(Self::APP_ID_VAR),
            chain_id: required(Self::CHAIN_ID_VAR)?,
            rpc_url,
            paymaster_address: required(Self::PAYMASTER_ADDRESS_VAR)?,
        })
    }

    pub fn auth_enabled(&self) -> bool {
        self.app_id.is_some()
    }
}
