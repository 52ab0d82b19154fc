//! Documents table.
//!
//! One row per document, keyed by collection and id, with the body stored
//! as JSON. `owner_id` and `year` mirror body fields and carry an index for
//! per-owner, per-year queries. Built with the schema builder so it runs on
//! Postgres and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Documents::Collection)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Documents::Id).string_len(128).not_null())
                    .col(ColumnDef::new(Documents::OwnerId).string_len(128).null())
                    .col(ColumnDef::new(Documents::Year).integer().null())
                    .col(ColumnDef::new(Documents::Data).json().not_null())
                    .col(
                        ColumnDef::new(Documents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Documents::Collection)
                            .col(Documents::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_owner_year")
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(Documents::Collection)
                    .col(Documents::OwnerId)
                    .col(Documents::Year)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Collection,
    Id,
    OwnerId,
    Year,
    Data,
    UpdatedAt,
}
