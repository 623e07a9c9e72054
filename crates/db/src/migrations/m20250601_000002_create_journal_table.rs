//! Create journal table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Journal::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Journal::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Journal::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Journal::Humor).string_len(64).not_null())
                    .col(ColumnDef::new(Journal::Title).string_len(256))
                    .col(ColumnDef::new(Journal::Content).text())
                    .col(ColumnDef::new(Journal::IsPinned).boolean().not_null().default(false))
                    .col(ColumnDef::new(Journal::Color).string_len(7).not_null().default("#ffffff"))
                    .col(ColumnDef::new(Journal::Report).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Journal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Journal::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_user_id")
                            .from(Journal::Table, Journal::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (user_id, created_at) for listing and the humor report
        manager
            .create_index(
                Index::create()
                    .name("idx_journal_user_id_created_at")
                    .table(Journal::Table)
                    .col(Journal::UserId)
                    .col(Journal::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Journal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Journal {
    Table,
    Id,
    UserId,
    Humor,
    Title,
    Content,
    IsPinned,
    Color,
    Report,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
