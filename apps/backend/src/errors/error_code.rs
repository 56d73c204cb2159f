//! Error codes for the Quill backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Quill backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required (every credential failure collapses here)
    Unauthorized,
    /// Wrong email or password on login
    InvalidCredentials,
    /// Authenticated, but not the owner of the resource
    NotOwner,
    /// Gated handler reached without an identity in request state
    MissingIdentity,

    // External identity flow
    /// Callback state does not match the issued anti-forgery value
    OauthInvalidState,
    /// Callback carried no authorization code
    OauthMissingCode,
    /// Code-for-token exchange with the provider failed
    OauthExchangeFailed,
    /// Provider profile could not be fetched or lacked an email
    OauthProfileFetchFailed,
    /// External login is not configured on this deployment
    OauthDisabled,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// Password does not satisfy the minimum policy
    InvalidPassword,
    /// Full name missing
    InvalidFullname,
    /// Malformed resource identifier in the path
    InvalidId,
    /// General validation error
    ValidationError,
    /// Nothing to update in a partial update
    NothingToUpdate,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// Post not found
    PostNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Email already used by another live account
    EmailTaken,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error (signing or hashing subsystem cannot operate)
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Authentication & Authorization
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotOwner => "NOT_OWNER",
            Self::MissingIdentity => "MISSING_IDENTITY",

            // External identity flow
            Self::OauthInvalidState => "OAUTH_INVALID_STATE",
            Self::OauthMissingCode => "OAUTH_MISSING_CODE",
            Self::OauthExchangeFailed => "OAUTH_EXCHANGE_FAILED",
            Self::OauthProfileFetchFailed => "OAUTH_PROFILE_FETCH_FAILED",
            Self::OauthDisabled => "OAUTH_DISABLED",

            // Request Validation
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidFullname => "INVALID_FULLNAME",
            Self::InvalidId => "INVALID_ID",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NothingToUpdate => "NOTHING_TO_UPDATE",
            Self::BadRequest => "BAD_REQUEST",

            // Resource Not Found
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::PostNotFound => "POST_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
