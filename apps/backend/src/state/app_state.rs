use std::sync::Arc;

use crate::adapters::MemoryStore;
use crate::auth::oauth::ExternalIdentityBridge;
use crate::auth::password::CredentialVerifier;
use crate::repos::posts::PostStore;
use crate::repos::users::UserStore;

use super::security_config::SecurityConfig;

/// Shared per-process state handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub security: SecurityConfig,
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub passwords: CredentialVerifier,
    /// `None` when external login is not configured.
    pub identity: Option<ExternalIdentityBridge>,
    /// Whether the OAuth state cookie is marked `Secure`.
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        passwords: CredentialVerifier,
    ) -> Self {
        Self {
            security,
            users,
            posts,
            passwords,
            identity: None,
            cookie_secure: true,
        }
    }

    /// One in-memory store serving both users and posts.
    pub fn in_memory(security: SecurityConfig, passwords: CredentialVerifier) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(security, store.clone(), store, passwords)
    }

    pub fn with_identity(mut self, bridge: ExternalIdentityBridge) -> Self {
        self.identity = Some(bridge);
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("security", &self.security)
            .field("external_login", &self.identity.is_some())
            .field("cookie_secure", &self.cookie_secure)
            .finish_non_exhaustive()
    }
}
