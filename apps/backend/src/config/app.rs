//! Process configuration read once from the environment at startup.

use std::num::NonZeroUsize;

use crate::error::AppError;

/// Google OAuth client registration. Present only when all three variables are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: Vec<u8>,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub google: Option<GoogleOAuthConfig>,
    pub oauth_cookie_secure: bool,
    pub password_hash_concurrency: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("BACKEND_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => 3000,
        };

        let jwt_secret = var("BACKEND_JWT_SECRET")
            .ok_or_else(|| AppError::config("BACKEND_JWT_SECRET must be set"))?
            .into_bytes();

        let google = match (
            var("GOOGLE_CLIENT_ID"),
            var("GOOGLE_CLIENT_SECRET"),
            var("GOOGLE_REDIRECT_URL"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_url)) => Some(GoogleOAuthConfig {
                client_id,
                client_secret,
                redirect_url,
            }),
            (None, None, None) => None,
            _ => {
                return Err(AppError::config(
                    "GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REDIRECT_URL must be set together",
                ))
            }
        };

        let oauth_cookie_secure = match var("OAUTH_COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::config(format!("OAUTH_COOKIE_SECURE must be true or false, got '{raw}'"))
            })?,
            None => true,
        };

        let password_hash_concurrency = match var("PASSWORD_HASH_CONCURRENCY") {
            Some(raw) => raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| {
                    AppError::config(format!(
                        "PASSWORD_HASH_CONCURRENCY must be a positive integer, got '{raw}'"
                    ))
                })?
                .get(),
            None => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            jwt_secret,
            database_url: var("DATABASE_URL"),
            google,
            oauth_cookie_secure,
            password_hash_concurrency,
            cors_allowed_origins,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
