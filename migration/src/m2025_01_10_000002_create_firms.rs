//! Migration to create the firms table.
//!
//! Firm names are unique per owner. Rows are never deleted; `active` is the
//! soft-delete flag.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Firms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Firms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Firms::Name).text().not_null())
                    .col(ColumnDef::new(Firms::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Firms::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_firms_owner_id")
                            .from(Firms::Table, Firms::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_firms_owner_name")
                    .table(Firms::Table)
                    .col(Firms::OwnerId)
                    .col(Firms::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_firms_owner_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Firms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Firms {
    Table,
    Id,
    Name,
    OwnerId,
    Active,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
