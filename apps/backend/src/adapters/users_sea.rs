//! SeaORM adapter for the user store.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use time::OffsetDateTime;
use uuid::Uuid;

use super::SeaStore;
use crate::entities::users;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;
use crate::repos::users::{Account, AccountChanges, NewAccount, UserStore};

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            fullname: model.fullname,
            password_hash: model.password_hash,
            created_at: model.created_at,
            is_deleted: model.is_deleted,
        }
    }
}

impl SeaStore {
    async fn live_user(&self, id: Uuid) -> Result<Option<users::Model>, DomainError> {
        users::Entity::find_by_id(id)
            .filter(users::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl UserStore for SeaStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        Ok(self.live_user(id).await?.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map(|m| m.map(Account::from))
            .map_err(map_db_err)
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError> {
        let active = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(account.email),
            fullname: Set(account.fullname),
            password_hash: Set(account.password_hash),
            created_at: Set(OffsetDateTime::now_utc()),
            is_deleted: Set(false),
        };

        active
            .insert(&self.db)
            .await
            .map(Account::from)
            .map_err(map_db_err)
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<Account, DomainError> {
        let current = self
            .live_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))?;

        if changes.is_empty() {
            return Ok(current.into());
        }

        let mut active = current.into_active_model();
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(fullname) = changes.fullname {
            active.fullname = Set(fullname);
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(Some(hash));
        }

        active
            .update(&self.db)
            .await
            .map(Account::from)
            .map_err(map_db_err)
    }
}
