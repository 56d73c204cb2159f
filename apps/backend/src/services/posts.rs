//! Post flows. Every mutation loads the post, applies the ownership rule,
//! then writes.

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::ownership::require_owner;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::repos::posts::{NewPost, OwnershipStamp, Post, PostChanges, PostStore};

#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub header: String,
    pub content: String,
    pub category: Vec<String>,
}

fn stamp(identity: &CurrentUser) -> OwnershipStamp {
    OwnershipStamp {
        id: identity.id,
        email: identity.email.clone(),
        fullname: identity.fullname.clone(),
        at: OffsetDateTime::now_utc(),
    }
}

async fn load(posts: &dyn PostStore, id: Uuid) -> Result<Post, AppError> {
    posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::PostNotFound, "Post not found!"))
}

pub async fn get(posts: &dyn PostStore, id: Uuid) -> Result<Post, AppError> {
    load(posts, id).await
}

pub async fn create(
    posts: &dyn PostStore,
    identity: &CurrentUser,
    draft: PostDraft,
) -> Result<Post, AppError> {
    if draft.header.is_empty() {
        return Err(AppError::invalid(ErrorCode::ValidationError, "Header is required."));
    }
    if draft.content.is_empty() {
        return Err(AppError::invalid(ErrorCode::ValidationError, "Content is required."));
    }

    let post = posts
        .create(NewPost {
            header: draft.header,
            content: draft.content,
            category: draft.category,
            created_by: stamp(identity),
        })
        .await?;
    info!(post_id = %post.id, owner = %identity.id, "Post created");
    Ok(post)
}

/// Load, check ownership, then validate `draft`. Empty fields are left as-is.
///
/// The draft is only inspected after the ownership check, so a non-owner
/// gets `NOT_OWNER` even for an empty update.
pub async fn update(
    posts: &dyn PostStore,
    identity: &CurrentUser,
    id: Uuid,
    draft: PostDraft,
) -> Result<Post, AppError> {
    let post = load(posts, id).await?;
    require_owner(identity, &post)?;

    if draft.header.is_empty() && draft.content.is_empty() && draft.category.is_empty() {
        return Err(AppError::bad_request(ErrorCode::NothingToUpdate, "Nothing to update"));
    }

    let non_empty = |s: String| Some(s).filter(|s| !s.is_empty());
    let changes = PostChanges {
        header: non_empty(draft.header),
        content: non_empty(draft.content),
        category: Some(draft.category).filter(|c| !c.is_empty()),
        updated_by: stamp(identity),
    };
    Ok(posts.update(post.id, changes).await?)
}

pub async fn delete(
    posts: &dyn PostStore,
    identity: &CurrentUser,
    id: Uuid,
) -> Result<Post, AppError> {
    let post = load(posts, id).await?;
    require_owner(identity, &post)?;

    let deleted = posts.soft_delete(post.id).await?;
    info!(post_id = %deleted.id, owner = %identity.id, "Post deleted");
    Ok(deleted)
}
