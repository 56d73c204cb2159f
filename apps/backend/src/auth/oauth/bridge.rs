use std::sync::Arc;
use std::time::SystemTime;

use tracing::info;

use super::{generate_state, IdentityProvider};
use crate::auth::{AuthError, ExternalFlowError};
use crate::logging::security;
use crate::repos::users::{Account, UserStore};
use crate::services::users::{find_or_create_external, issue_token};
use crate::state::security_config::SecurityConfig;

/// Where to send the user agent, and the state to remember until the callback.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

#[derive(Debug, Clone)]
pub struct ExternalLogin {
    pub token: String,
    pub account: Account,
    pub raw_profile: String,
}

#[derive(Clone)]
pub struct ExternalIdentityBridge {
    provider: Arc<dyn IdentityProvider>,
}

fn fail(err: ExternalFlowError) -> AuthError {
    security::oauth_failed(err.stage(), &err.to_string());
    AuthError::External(err)
}

impl ExternalIdentityBridge {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn begin(&self) -> AuthorizationRequest {
        let state = generate_state();
        AuthorizationRequest {
            url: self.provider.authorization_url(&state),
            state,
        }
    }

    /// Finish the flow started by [`begin`](Self::begin).
    ///
    /// `expected_state` is what was issued to this user agent; the provider is
    /// never contacted unless it matches `state`.
    pub async fn complete(
        &self,
        expected_state: Option<&str>,
        state: Option<&str>,
        code: Option<&str>,
        users: &dyn UserStore,
        security: &SecurityConfig,
        now: SystemTime,
    ) -> Result<ExternalLogin, AuthError> {
        match (expected_state, state) {
            (Some(expected), Some(got)) if !expected.is_empty() && expected == got => {}
            _ => return Err(fail(ExternalFlowError::InvalidState)),
        }
        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| fail(ExternalFlowError::MissingCode))?;

        let access_token = self.provider.exchange_code(code).await.map_err(fail)?;
        let profile = self
            .provider
            .fetch_profile(&access_token)
            .await
            .map_err(fail)?;

        let account = find_or_create_external(users, &profile.email, profile.name.as_deref()).await?;
        let token = issue_token(&account, security, now)?;
        info!(user_id = %account.id, "External login completed");

        Ok(ExternalLogin {
            token,
            account,
            raw_profile: profile.raw,
        })
    }
}
