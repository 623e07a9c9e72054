//! Create post response table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostResponse::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostResponse::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(PostResponse::Content).text().not_null())
                    .col(
                        ColumnDef::new(PostResponse::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PostResponse::IsReported)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PostResponse::ReportReason).text())
                    .col(
                        ColumnDef::new(PostResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PostResponse::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_response_post_id")
                            .from(PostResponse::Table, PostResponse::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_response_author_id")
                            .from(PostResponse::Table, PostResponse::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (post_id, created_at) for threads
        manager
            .create_index(
                Index::create()
                    .name("idx_post_response_post_id_created_at")
                    .table(PostResponse::Table)
                    .col(PostResponse::PostId)
                    .col(PostResponse::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostResponse::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostResponse {
    Table,
    Id,
    PostId,
    AuthorId,
    Content,
    IsAnonymous,
    IsReported,
    ReportReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
