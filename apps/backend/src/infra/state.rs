use std::sync::Arc;

use tracing::info;

use crate::adapters::SeaStore;
use crate::auth::oauth::{ExternalIdentityBridge, GoogleProvider};
use crate::auth::password::CredentialVerifier;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::db::connect_and_migrate;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Build the process state from configuration.
///
/// A configured `DATABASE_URL` selects the SeaORM store, otherwise data is
/// held in memory. Google login is wired only when fully configured.
pub async fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    let security = SecurityConfig::new(config.jwt_secret.clone());
    let passwords = CredentialVerifier::new(config.password_hash_concurrency);

    let state = match &config.database_url {
        Some(url) => {
            let store = Arc::new(SeaStore::new(connect_and_migrate(url).await?));
            AppState::new(security, store.clone(), store, passwords)
        }
        None => {
            info!("No DATABASE_URL configured; using in-memory store");
            AppState::in_memory(security, passwords)
        }
    };

    let state = match &config.google {
        Some(google) => {
            let provider = GoogleProvider::new(google.clone())?;
            state.with_identity(ExternalIdentityBridge::new(Arc::new(provider)))
        }
        None => {
            info!("Google login not configured");
            state
        }
    };

    Ok(state.with_cookie_secure(config.oauth_cookie_secure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoogleOAuthConfig;

    fn config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "BACKEND_JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn memory_state_without_database_url() {
        let state = build_state(&config()).await.unwrap();
        assert!(state.identity.is_none());
        assert!(state.cookie_secure);
    }

    #[tokio::test]
    async fn sqlite_state_runs_migrations() {
        let mut config = config();
        config.database_url = Some("sqlite::memory:".into());
        config.google = Some(GoogleOAuthConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            redirect_url: "http://localhost/cb".into(),
        });

        let state = build_state(&config).await.unwrap();
        assert!(state.identity.is_some());
        assert!(state.users.find_by_email("nobody@x.com").await.unwrap().is_none());
    }
}
