//! Create forum and forum moderator tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Forum::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Forum::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Forum::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Forum::Description).text())
                    .col(ColumnDef::new(Forum::Thematic).string_len(128).not_null())
                    .col(ColumnDef::new(Forum::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Forum::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_forum_name")
                    .table(Forum::Table)
                    .col(Forum::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: thematic
        manager
            .create_index(
                Index::create()
                    .name("idx_forum_thematic")
                    .table(Forum::Table)
                    .col(Forum::Thematic)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ForumModerator::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumModerator::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumModerator::ForumId).string_len(32).not_null())
                    .col(ColumnDef::new(ForumModerator::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ForumModerator::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_moderator_forum_id")
                            .from(ForumModerator::Table, ForumModerator::ForumId)
                            .to(Forum::Table, Forum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_moderator_user_id")
                            .from(ForumModerator::Table, ForumModerator::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (forum_id, user_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_forum_moderator_forum_user")
                    .table(ForumModerator::Table)
                    .col(ForumModerator::ForumId)
                    .col(ForumModerator::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForumModerator::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forum::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Forum {
    Table,
    Id,
    Name,
    Description,
    Thematic,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum ForumModerator {
    Table,
    Id,
    ForumId,
    UserId,
    AssignedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
