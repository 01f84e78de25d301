//! Migration to create the vehicles table.
//!
//! Plates are unique per owner. Vehicles keep a direct owner reference next to
//! their firm so every query can be scoped without a join.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Plate).text().not_null())
                    .col(ColumnDef::new(Vehicles::FirmId).integer().not_null())
                    .col(ColumnDef::new(Vehicles::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Vehicles::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_firm_id")
                            .from(Vehicles::Table, Vehicles::FirmId)
                            .to(Firms::Table, Firms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_owner_id")
                            .from(Vehicles::Table, Vehicles::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_owner_plate")
                    .table(Vehicles::Table)
                    .col(Vehicles::OwnerId)
                    .col(Vehicles::Plate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Cascade deactivation filters on firm_id
        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_firm_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::FirmId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_vehicles_owner_plate").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_vehicles_firm_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    Plate,
    FirmId,
    OwnerId,
    Active,
}

#[derive(DeriveIden)]
enum Firms {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
