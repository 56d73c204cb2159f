//! Account flows: registration, password login, external find-or-create and
//! profile updates.

use std::sync::LazyLock;
use std::time::SystemTime;

use regex::Regex;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::auth::jwt::mint_access_token;
use crate::auth::password::CredentialVerifier;
use crate::auth::AuthError;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{Account, AccountChanges, NewAccount, UserStore};
use crate::state::security_config::SecurityConfig;

pub const MIN_PASSWORD_LEN: usize = 6;

#[allow(clippy::unwrap_used)]
static EMAIL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Trim, NFKC-normalize and lowercase an email for storage and lookup.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().nfkc().collect::<String>().to_lowercase()
}

/// Normalize `raw` and check its format.
pub fn parse_email(raw: &str) -> Result<String, AppError> {
    let email = normalize_email(raw);
    if email.len() > 254 || !EMAIL_FORMAT.is_match(&email) {
        return Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "Invalid email address format.",
        ));
    }
    Ok(email)
}

pub fn check_password_policy(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

fn parse_fullname(raw: &str) -> Result<String, AppError> {
    let fullname = raw.trim();
    if fullname.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidFullname,
            "Fullname is required.",
        ));
    }
    Ok(fullname.to_string())
}

/// Name for an externally created account: the provider's name, else the
/// email local part.
fn derive_fullname(name: Option<&str>, email: &str) -> String {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    email.split('@').next().unwrap_or(email).to_string()
}

fn email_conflict(err: DomainError) -> AuthError {
    if err.is_email_taken() {
        AuthError::ConflictingIdentity
    } else {
        AuthError::Store(err)
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub fullname: String,
}

/// Create a password account. The email must not belong to a live account.
pub async fn register(
    users: &dyn UserStore,
    passwords: &CredentialVerifier,
    form: Registration,
) -> Result<Account, AppError> {
    let email = parse_email(&form.email)?;
    check_password_policy(&form.password)?;
    let fullname = parse_fullname(&form.fullname)?;

    if users.find_by_email(&email).await?.is_some() {
        return Err(AuthError::ConflictingIdentity.into());
    }

    let password_hash = passwords.hash(form.password).await?;
    let account = users
        .create(NewAccount {
            email,
            fullname,
            password_hash: Some(password_hash),
        })
        .await
        .map_err(email_conflict)?;

    info!(user_id = %account.id, email = %Redacted(&account.email), "Account registered");
    Ok(account)
}

/// Issue an access token for `account`.
pub fn issue_token(
    account: &Account,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<String, AuthError> {
    mint_access_token(account.id, &account.email, &account.fullname, now, security)
}

/// Verify an email/password pair and issue a token.
///
/// Unknown email, deleted account, password-less account and wrong password
/// are indistinguishable to the caller.
pub async fn login(
    users: &dyn UserStore,
    passwords: &CredentialVerifier,
    security: &SecurityConfig,
    email: &str,
    password: String,
    now: SystemTime,
) -> Result<String, AppError> {
    let email = parse_email(email)?;
    if password.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            "Password is required.",
        ));
    }

    let Some(account) = users.find_by_email(&email).await? else {
        security::login_failed("unknown_email", Some(&email));
        return Err(AuthError::InvalidCredentials.into());
    };
    let Some(hash) = account.password_hash.clone() else {
        security::login_failed("no_password", Some(&email));
        return Err(AuthError::InvalidCredentials.into());
    };
    if !passwords.verify(hash, password).await {
        security::login_failed("wrong_password", Some(&email));
        return Err(AuthError::InvalidCredentials.into());
    }

    debug!(user_id = %account.id, "Password login succeeded");
    Ok(issue_token(&account, security, now)?)
}

/// Resolve an externally verified email to a local account, creating one
/// without a password on first sight.
///
/// Existing accounts with the same email are reused, including password
/// accounts.
pub async fn find_or_create_external(
    users: &dyn UserStore,
    email: &str,
    name: Option<&str>,
) -> Result<Account, AuthError> {
    let email = normalize_email(email);
    if let Some(existing) = users.find_by_email(&email).await? {
        debug!(user_id = %existing.id, email = %Redacted(&email), "External login for existing account");
        return Ok(existing);
    }

    let created = users
        .create(NewAccount {
            fullname: derive_fullname(name, &email),
            email: email.clone(),
            password_hash: None,
        })
        .await;

    match created {
        Ok(account) => {
            info!(user_id = %account.id, email = %Redacted(&email), "Account created from external login");
            Ok(account)
        }
        // Lost a race with a concurrent first login for the same email.
        Err(e) if e.is_email_taken() => users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::ConflictingIdentity),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub fullname: Option<String>,
}

/// Apply a partial profile update for `id`. Empty strings count as absent.
pub async fn update_profile(
    users: &dyn UserStore,
    passwords: &CredentialVerifier,
    id: Uuid,
    update: ProfileUpdate,
) -> Result<Account, AppError> {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let email = present(update.email).map(|e| parse_email(&e)).transpose()?;
    let password = present(update.password);
    if let Some(password) = &password {
        check_password_policy(password)?;
    }
    let fullname = present(update.fullname).map(|f| f.trim().to_string());

    if let Some(email) = &email {
        if let Some(other) = users.find_by_email(email).await? {
            if other.id != id {
                return Err(AuthError::ConflictingIdentity.into());
            }
        }
    }

    let password_hash = match password {
        Some(password) => Some(passwords.hash(password).await?),
        None => None,
    };

    let changes = AccountChanges {
        email,
        fullname,
        password_hash,
    };
    users.update(id, changes).await.map_err(|e| match e {
        DomainError::NotFound(NotFoundKind::User, _) => {
            AppError::not_found(ErrorCode::UserNotFound, "User not found")
        }
        other => email_conflict(other).into(),
    })
}
