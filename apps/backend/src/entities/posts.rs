use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub header: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_name = "created_by_id")]
    pub created_by_id: Uuid,
    #[sea_orm(column_name = "created_by_email")]
    pub created_by_email: String,
    #[sea_orm(column_name = "created_by_fullname")]
    pub created_by_fullname: String,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_by_id")]
    pub updated_by_id: Option<Uuid>,
    #[sea_orm(column_name = "updated_by_email")]
    pub updated_by_email: Option<String>,
    #[sea_orm(column_name = "updated_by_fullname")]
    pub updated_by_fullname: Option<String>,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "is_deleted")]
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedById",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::post_categories::Entity")]
    Categories,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::post_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
