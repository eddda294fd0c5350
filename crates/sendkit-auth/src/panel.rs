//! Sign-in / sign-out panel state.

use std::sync::{Arc, Mutex};

use sendkit_types::{Result, SendkitError};
use tracing::{info, warn};

use crate::{AuthConfig, AuthProvider, LoginOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthActivity {
    #[default]
    Idle,
    LoggingOut,
}

/// What the panel should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPanelView {
    /// No app id configured.
    Disabled { notice: String },
    SignIn { disabled: bool },
    SignOut { disabled: bool, busy: bool },
}

pub struct AuthPanel {
    provider: Option<Arc<dyn AuthProvider>>,
    activity: Mutex<AuthActivity>,
}

/// Returns the panel to `Idle` however the logout future ends.
struct ActivityReset<'a>(&'a Mutex<AuthActivity>);

impl Drop for ActivityReset<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap() = AuthActivity::Idle;
    }
}

impl AuthPanel {
    /// The provider is only wired in when the config carries an app id.
    pub fn new(config: &AuthConfig, provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider: config.auth_enabled().then_some(provider),
            activity: Mutex::new(AuthActivity::Idle),
        }
    }

    pub fn disabled() -> Self {
        Self {
            provider: None,
            activity: Mutex::new(AuthActivity::Idle),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn activity(&self) -> AuthActivity {
        *self.activity.lock().unwrap()
    }

    pub fn view(&self) -> AuthPanelView {
        let Some(provider) = &self.provider else {
            return AuthPanelView::Disabled {
                notice: format!(
                    "Authentication disabled. Set {} to enable authentication locally.",
                    AuthConfig::APP_ID_VAR
                ),
            };
        };

        let disabled = !provider.is_ready();
        if provider.is_authenticated() {
            AuthPanelView::SignOut {
                disabled,
                busy: self.activity() == AuthActivity::LoggingOut,
            }
        } else {
            AuthPanelView::SignIn { disabled }
        }
    }

    /// Open a wallet login limited to Ethereum wallets.
    pub async fn sign_in(&self) -> Result<()> {
        let provider = self.enabled_provider()?;
        provider.login(&LoginOptions::ethereum_wallet()).await?;
        info!("signed in with wallet");
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<()> {
        let provider = self.enabled_provider()?;
        *self.activity.lock().unwrap() = AuthActivity::LoggingOut;
        let _reset = ActivityReset(&self.activity);

        provider.logout().await.inspect_err(|e| {
            warn!(error = %e, "logout failed");
        })
    }

    fn enabled_provider(&self) -> Result<&Arc<dyn AuthProvider>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| SendkitError::Auth("authentication is disabled".into()))?;
        if !provider.is_ready() {
            return Err(SendkitError::Auth("provider is not ready".into()));
        }
        Ok(provider)
    }
}
