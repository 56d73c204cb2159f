//! Authentication and authorization core.
//!
//! Password hashing, credential issue/validation, the ownership rule and the
//! external identity flow. HTTP concerns live in `middleware::auth_gate` and
//! `routes`; everything here is transport-agnostic.

pub mod jwt;
pub mod oauth;
pub mod ownership;
pub mod password;

use thiserror::Error;

use crate::errors::domain::DomainError;

/// Failures of the external authorization-code flow.
///
/// The payload strings are operator detail; callers only ever see
/// [`ExternalFlowError::public_detail`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalFlowError {
    #[error("callback state does not match the issued state")]
    InvalidState,
    #[error("callback carried no authorization code")]
    MissingCode,
    #[error("code exchange failed: {0}")]
    ExchangeFailed(String),
    #[error("profile fetch failed: {0}")]
    ProfileFetchFailed(String),
}

impl ExternalFlowError {
    pub fn public_detail(&self) -> &'static str {
        match self {
            Self::InvalidState => "Invalid state",
            Self::MissingCode => "Code not found.",
            Self::ExchangeFailed(_) => "Failed to exchange authorization code",
            Self::ProfileFetchFailed(_) => "Failed to fetch user profile",
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidState => "state",
            Self::MissingCode => "code",
            Self::ExchangeFailed(_) => "exchange",
            Self::ProfileFetchFailed(_) => "profile",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, malformed, forged or expired credential, or unknown subject.
    #[error("authentication required")]
    Unauthenticated,
    /// Authenticated subject is not the owner of the target resource.
    #[error("not the owner of the resource")]
    Unauthorized,
    #[error("wrong email or password")]
    InvalidCredentials,
    #[error("email already used by another account")]
    ConflictingIdentity,
    #[error(transparent)]
    External(#[from] ExternalFlowError),
    /// Signing or hashing subsystem cannot operate.
    #[error("fatal security configuration: {0}")]
    FatalConfiguration(String),
    #[error(transparent)]
    Store(#[from] DomainError),
}
