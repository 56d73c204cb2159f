//! In-memory implementation of the user and post stores.
//!
//! Used when no `DATABASE_URL` is configured and by the HTTP tests. The email
//! index mirrors the partial unique index of the SQL schema: it covers live
//! accounts only.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::posts::{NewPost, Post, PostChanges, PostStore};
use crate::repos::users::{Account, AccountChanges, NewAccount, UserStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: DashMap<Uuid, Account>,
    emails: DashMap<String, Uuid>,
    posts: DashMap<Uuid, Post>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Soft-delete an account and release its email.
    ///
    /// The account guard is released before the email index is touched;
    /// `create` locks the index first, so holding both would deadlock.
    pub fn deactivate_account(&self, id: Uuid) -> bool {
        let email = {
            let Some(mut account) = self.accounts.get_mut(&id) else {
                return false;
            };
            if account.is_deleted {
                return false;
            }
            account.is_deleted = true;
            account.email.clone()
        };
        self.emails.remove_if(&email, |_, owner| *owner == id);
        true
    }

    fn live_posts<F>(&self, keep: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool,
    {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| !p.is_deleted && keep(p.value()))
            .map(|p| p.value().clone())
            .collect();
        posts.sort_by(|a, b| {
            a.created_by
                .at
                .cmp(&b.created_by.at)
                .then_with(|| a.id.cmp(&b.id))
        });
        posts
    }
}

fn email_taken() -> DomainError {
    DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered")
}

fn user_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::User, "User not found")
}

fn post_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Post, "Post not found")
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        Ok(self
            .accounts
            .get(&id)
            .filter(|a| !a.is_deleted)
            .map(|a| a.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let Some(id) = self.emails.get(email).map(|e| *e.value()) else {
            return Ok(None);
        };
        UserStore::find_by_id(self, id).await
    }

    async fn create(&self, new: NewAccount) -> Result<Account, DomainError> {
        let account = Account {
            id: Uuid::new_v4(),
            email: new.email,
            fullname: new.fullname,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
            is_deleted: false,
        };

        match self.emails.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(email_taken()),
            Entry::Vacant(slot) => {
                self.accounts.insert(account.id, account.clone());
                slot.insert(account.id);
                Ok(account)
            }
        }
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<Account, DomainError> {
        let current = self
            .accounts
            .get(&id)
            .filter(|a| !a.is_deleted)
            .map(|a| a.value().clone())
            .ok_or_else(user_not_found)?;

        if let Some(new_email) = changes.email.as_ref().filter(|e| **e != current.email) {
            match self.emails.entry(new_email.clone()) {
                Entry::Occupied(_) => return Err(email_taken()),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.emails.remove_if(&current.email, |_, owner| *owner == id);
        }

        let mut entry = self.accounts.get_mut(&id).ok_or_else(user_not_found)?;
        let account = entry.value_mut();
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(fullname) = changes.fullname {
            account.fullname = fullname;
        }
        if let Some(hash) = changes.password_hash {
            account.password_hash = Some(hash);
        }
        Ok(account.clone())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.live_posts(|_| true))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self
            .posts
            .get(&id)
            .filter(|p| !p.is_deleted)
            .map(|p| p.value().clone()))
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.live_posts(|p| p.created_by.id == owner))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, DomainError> {
        Ok(self.live_posts(|p| p.category.iter().any(|c| c == category)))
    }

    async fn create(&self, new: NewPost) -> Result<Post, DomainError> {
        let post = Post {
            id: Uuid::new_v4(),
            header: new.header,
            content: new.content,
            category: new.category,
            created_by: new.created_by,
            updated_by: None,
            is_deleted: false,
        };
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let mut entry = self
            .posts
            .get_mut(&id)
            .filter(|p| !p.is_deleted)
            .ok_or_else(post_not_found)?;
        let post = entry.value_mut();
        if let Some(header) = changes.header {
            post.header = header;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(category) = changes.category {
            post.category = category;
        }
        post.updated_by = Some(changes.updated_by);
        Ok(post.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Post, DomainError> {
        let mut entry = self
            .posts
            .get_mut(&id)
            .filter(|p| !p.is_deleted)
            .ok_or_else(post_not_found)?;
        entry.is_deleted = true;
        Ok(entry.value().clone())
    }
}
