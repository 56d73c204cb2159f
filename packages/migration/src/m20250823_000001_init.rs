use sea_orm::Statement;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Fullname,
    PasswordHash,
    CreatedAt,
    IsDeleted,
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
    Header,
    Content,
    CreatedById,
    CreatedByEmail,
    CreatedByFullname,
    CreatedAt,
    UpdatedById,
    UpdatedByEmail,
    UpdatedByFullname,
    UpdatedAt,
    IsDeleted,
}

#[derive(Iden)]
enum PostCategories {
    Table,
    PostId,
    Position,
    Category,
}

/// Emails are unique among live accounts only; soft-deleted rows keep theirs.
const LIVE_EMAIL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS ux_users_email_live ON users (email) WHERE is_deleted = false";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Fullname).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        db.execute(Statement::from_string(
            manager.get_database_backend(),
            LIVE_EMAIL_INDEX.to_string(),
        ))
        .await?;

        // posts
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::Header).text().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::CreatedById).uuid().not_null())
                    .col(ColumnDef::new(Posts::CreatedByEmail).string().not_null())
                    .col(ColumnDef::new(Posts::CreatedByFullname).string().not_null())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Posts::UpdatedById).uuid().null())
                    .col(ColumnDef::new(Posts::UpdatedByEmail).string().null())
                    .col(ColumnDef::new(Posts::UpdatedByFullname).string().null())
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Posts::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_created_by")
                            .from(Posts::Table, Posts::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_posts_created_by_id")
                    .table(Posts::Table)
                    .col(Posts::CreatedById)
                    .to_owned(),
            )
            .await?;

        // post_categories
        manager
            .create_table(
                Table::create()
                    .table(PostCategories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostCategories::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostCategories::Position).integer().not_null())
                    .col(ColumnDef::new(PostCategories::Category).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostCategories::PostId)
                            .col(PostCategories::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_categories_post")
                            .from(PostCategories::Table, PostCategories::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_post_categories_category")
                    .table(PostCategories::Table)
                    .col(PostCategories::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_post_categories_category")
                    .table(PostCategories::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PostCategories::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_posts_created_by_id")
                    .table(Posts::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_users_email_live")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
