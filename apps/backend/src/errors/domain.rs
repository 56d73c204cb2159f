//! Store-facing error type.
//!
//! Stores and services return `DomainError`; it knows nothing about HTTP or
//! the database driver. `error::AppError` owns the mapping to responses.

use thiserror::Error;

/// What a store failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    User,
    Post,
    /// A row the driver reported missing outside a typed lookup.
    Record,
}

/// Which uniqueness rule a write broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Another live account already uses the email.
    UniqueEmail,
    /// Any other unique index.
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    Database,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict ({0:?}): {1}")]
    Conflict(ConflictKind, String),
    #[error("{0:?} not found: {1}")]
    NotFound(NotFoundKind, String),
    #[error("infrastructure failure ({0:?}): {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// True when the error means the email belongs to another live account.
    pub fn is_email_taken(&self) -> bool {
        matches!(self, Self::Conflict(ConflictKind::UniqueEmail, _))
    }
}
