//! Posts and their ownership stamps.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::ownership::Owned;
use crate::errors::domain::DomainError;

/// Who created a post, and when. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnershipStamp {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    pub at: OffsetDateTime,
}

/// Who last edited a post. Informational only; never consulted for access.
pub type EditStamp = OwnershipStamp;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub header: String,
    pub content: String,
    pub category: Vec<String>,
    pub created_by: OwnershipStamp,
    pub updated_by: Option<EditStamp>,
    pub is_deleted: bool,
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.created_by.id
    }

    fn resource_label(&self) -> String {
        format!("post:{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub header: String,
    pub content: String,
    pub category: Vec<String>,
    pub created_by: OwnershipStamp,
}

/// Partial update. The edit stamp is always replaced.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub header: Option<String>,
    pub content: Option<String>,
    pub category: Option<Vec<String>>,
    pub updated_by: EditStamp,
}

/// Post persistence. Reads return live posts only, oldest first.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Post>, DomainError>;

    /// Posts whose category list contains `category` exactly.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, DomainError>;

    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;

    /// Fails with `NotFound(Post)` for unknown or deleted ids.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError>;

    /// Marks the post deleted and returns it. `NotFound(Post)` if already gone.
    async fn soft_delete(&self, id: Uuid) -> Result<Post, DomainError>;
}
