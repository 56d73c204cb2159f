use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, error};
use uuid::Uuid;

use super::AuthError;
use crate::state::security_config::SecurityConfig;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Identity claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (UUID string)
    pub sub: String,
    pub email: String,
    pub fullname: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    #[serde(rename = "expiryDate")]
    pub expiry_date: String,
    #[serde(rename = "expiryDateInMillis")]
    pub expiry_date_in_millis: i64,
}

impl Claims {
    pub fn subject_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::Unauthenticated)
    }
}

fn unix_secs(now: SystemTime) -> Result<i64, AuthError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AuthError::FatalConfiguration("system clock before unix epoch".into()))
}

/// Mint an HS256 access token valid for [`ACCESS_TOKEN_TTL`] from `now`.
///
/// Deterministic for identical inputs.
pub fn mint_access_token(
    sub: Uuid,
    email: &str,
    fullname: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::FatalConfiguration(
            "JWT signing secret is empty".into(),
        ));
    }

    let iat = unix_secs(now)?;
    let exp = iat + ACCESS_TOKEN_TTL.as_secs() as i64;
    let expiry_date = OffsetDateTime::from_unix_timestamp(exp)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .ok_or_else(|| AuthError::FatalConfiguration(format!("expiry {exp} out of range")))?;

    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        fullname: fullname.to_string(),
        iat,
        exp,
        expiry_date,
        expiry_date_in_millis: exp * 1000,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &security.encoding_key(),
    )
    .map_err(|e| AuthError::FatalConfiguration(format!("failed to encode JWT: {e}")))
}

/// Verify signature, algorithm and expiry of a bare token.
///
/// Expiry is checked against `now` with no leeway: valid iff `now < exp`.
pub fn verify_access_token(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        error!("JWT signing secret is empty; rejecting all credentials");
        return Err(AuthError::Unauthenticated);
    }

    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(token, &security.decoding_key(), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(reason = ?e.kind(), "Rejected credential");
            AuthError::Unauthenticated
        })?;

    let now_secs = unix_secs(now).map_err(|_| AuthError::Unauthenticated)?;
    if now_secs >= claims.exp {
        debug!(reason = "expired", exp = claims.exp, now = now_secs, "Rejected credential");
        return Err(AuthError::Unauthenticated);
    }

    Ok(claims)
}

/// Validate a raw `Authorization` header value of the form `Bearer <token>`.
///
/// Every failure is `AuthError::Unauthenticated`; the cause is only logged.
pub fn verify_bearer_header(
    raw: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Claims, AuthError> {
    let parts: Vec<&str> = raw.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        debug!(parts = parts.len(), "Rejected credential: malformed authorization header");
        return Err(AuthError::Unauthenticated);
    };
    if *scheme != "Bearer" {
        debug!("Rejected credential: scheme is not Bearer");
        return Err(AuthError::Unauthenticated);
    }

    let claims = verify_access_token(token, now, security)?;
    if claims.subject_id().is_err() {
        debug!("Rejected credential: subject is not a UUID");
        return Err(AuthError::Unauthenticated);
    }
    Ok(claims)
}
