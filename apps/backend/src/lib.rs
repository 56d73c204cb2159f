#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

pub use adapters::{MemoryStore, SeaStore};
pub use auth::jwt::{mint_access_token, verify_access_token, Claims};
pub use auth::oauth::{ExternalIdentityBridge, IdentityProvider};
pub use auth::password::CredentialVerifier;
pub use auth::{AuthError, ExternalFlowError};
pub use config::AppConfig;
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use extractors::CurrentUser;
pub use middleware::AuthGate;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
