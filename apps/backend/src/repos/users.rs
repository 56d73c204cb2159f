//! Account records and the store interface the auth core depends on.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::domain::DomainError;

/// Account domain model. Never holds a plaintext password.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    /// Normalized (trimmed, NFKC, lowercase)
    pub email: String,
    pub fullname: String,
    /// `None` for accounts created through external login.
    pub password_hash: Option<String>,
    pub created_at: OffsetDateTime,
    pub is_deleted: bool,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub fullname: String,
    pub password_hash: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub fullname: Option<String>,
    pub password_hash: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.fullname.is_none() && self.password_hash.is_none()
    }
}

/// Account persistence. Every lookup excludes soft-deleted accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Fails with `Conflict(UniqueEmail)` when a live account already uses the email.
    async fn create(&self, account: NewAccount) -> Result<Account, DomainError>;

    /// Fails with `NotFound(User)` for unknown or deleted ids and with
    /// `Conflict(UniqueEmail)` when the new email belongs to another live account.
    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<Account, DomainError>;
}
