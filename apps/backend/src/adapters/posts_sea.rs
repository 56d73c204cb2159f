//! SeaORM adapter for the post store.
//!
//! Categories live in `post_categories` (one row per category, ordered by
//! `position`) so category lookups can use an index.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use super::SeaStore;
use crate::entities::{post_categories, posts};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;
use crate::repos::posts::{EditStamp, NewPost, OwnershipStamp, Post, PostChanges, PostStore};

fn post_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Post, "Post not found")
}

fn to_post(model: posts::Model, category: Vec<String>) -> Post {
    let updated_by = match (
        model.updated_by_id,
        model.updated_by_email,
        model.updated_by_fullname,
        model.updated_at,
    ) {
        (Some(id), Some(email), Some(fullname), Some(at)) => Some(EditStamp {
            id,
            email,
            fullname,
            at,
        }),
        _ => None,
    };

    Post {
        id: model.id,
        header: model.header,
        content: model.content,
        category,
        created_by: OwnershipStamp {
            id: model.created_by_id,
            email: model.created_by_email,
            fullname: model.created_by_fullname,
            at: model.created_at,
        },
        updated_by,
        is_deleted: model.is_deleted,
    }
}

fn live_posts() -> Select<posts::Entity> {
    posts::Entity::find()
        .filter(posts::Column::IsDeleted.eq(false))
        .order_by_asc(posts::Column::CreatedAt)
        .order_by_asc(posts::Column::Id)
}

async fn categories_for<C: ConnectionTrait>(
    conn: &C,
    post_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<String>>, DomainError> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = post_categories::Entity::find()
        .filter(post_categories::Column::PostId.is_in(post_ids))
        .order_by_asc(post_categories::Column::PostId)
        .order_by_asc(post_categories::Column::Position)
        .all(conn)
        .await
        .map_err(map_db_err)?;

    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.post_id).or_default().push(row.category);
    }
    Ok(grouped)
}

async fn replace_categories(
    txn: &DatabaseTransaction,
    post_id: Uuid,
    category: &[String],
) -> Result<(), DomainError> {
    post_categories::Entity::delete_many()
        .filter(post_categories::Column::PostId.eq(post_id))
        .exec(txn)
        .await
        .map_err(map_db_err)?;

    if category.is_empty() {
        return Ok(());
    }

    let rows = category
        .iter()
        .enumerate()
        .map(|(position, name)| post_categories::ActiveModel {
            post_id: Set(post_id),
            position: Set(position as i32),
            category: Set(name.clone()),
        });

    post_categories::Entity::insert_many(rows)
        .exec_without_returning(txn)
        .await
        .map_err(map_db_err)?;
    Ok(())
}

impl SeaStore {
    async fn with_categories(&self, models: Vec<posts::Model>) -> Result<Vec<Post>, DomainError> {
        let ids = models.iter().map(|m| m.id).collect();
        let mut categories = categories_for(&self.db, ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let category = categories.remove(&m.id).unwrap_or_default();
                to_post(m, category)
            })
            .collect())
    }

    async fn live_post<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<Option<posts::Model>, DomainError> {
        posts::Entity::find_by_id(id)
            .filter(posts::Column::IsDeleted.eq(false))
            .one(conn)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl PostStore for SeaStore {
    async fn list(&self) -> Result<Vec<Post>, DomainError> {
        let models = live_posts().all(&self.db).await.map_err(map_db_err)?;
        self.with_categories(models).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let Some(model) = Self::live_post(&self.db, id).await? else {
            return Ok(None);
        };
        Ok(self.with_categories(vec![model]).await?.pop())
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Post>, DomainError> {
        let models = live_posts()
            .filter(posts::Column::CreatedById.eq(owner))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        self.with_categories(models).await
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, DomainError> {
        let tagged = Query::select()
            .column(post_categories::Column::PostId)
            .from(post_categories::Entity)
            .and_where(post_categories::Column::Category.eq(category))
            .to_owned();

        let models = live_posts()
            .filter(posts::Column::Id.in_subquery(tagged))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        self.with_categories(models).await
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let active = posts::ActiveModel {
            id: Set(Uuid::new_v4()),
            header: Set(post.header),
            content: Set(post.content),
            created_by_id: Set(post.created_by.id),
            created_by_email: Set(post.created_by.email),
            created_by_fullname: Set(post.created_by.fullname),
            created_at: Set(post.created_by.at),
            updated_by_id: Set(None),
            updated_by_email: Set(None),
            updated_by_fullname: Set(None),
            updated_at: Set(None),
            is_deleted: Set(false),
        };
        let model = active.insert(&txn).await.map_err(map_db_err)?;
        replace_categories(&txn, model.id, &post.category).await?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(to_post(model, post.category))
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let current = Self::live_post(&txn, id).await?.ok_or_else(post_not_found)?;

        let mut active = current.into_active_model();
        if let Some(header) = changes.header {
            active.header = Set(header);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        active.updated_by_id = Set(Some(changes.updated_by.id));
        active.updated_by_email = Set(Some(changes.updated_by.email));
        active.updated_by_fullname = Set(Some(changes.updated_by.fullname));
        active.updated_at = Set(Some(changes.updated_by.at));
        let model = active.update(&txn).await.map_err(map_db_err)?;

        if let Some(category) = &changes.category {
            replace_categories(&txn, id, category).await?;
        }
        let category = categories_for(&txn, vec![id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        txn.commit().await.map_err(map_db_err)?;
        Ok(to_post(model, category))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Post, DomainError> {
        let current = Self::live_post(&self.db, id)
            .await?
            .ok_or_else(post_not_found)?;

        let mut active = current.into_active_model();
        active.is_deleted = Set(true);
        let model = active.update(&self.db).await.map_err(map_db_err)?;

        let mut posts = self.with_categories(vec![model]).await?;
        posts.pop().ok_or_else(post_not_found)
    }
}
