//! Migration to create the records table.
//!
//! Sale records carry the sale amount and the commission derived from it at
//! insertion time. `recorded_on` defaults to the current date.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Records::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Records::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Records::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Records::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Records::SaleAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Records::Commission)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Records::RecordedOn)
                            .date()
                            .not_null()
                            .default(Expr::current_date()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_records_vehicle_id")
                            .from(Records::Table, Records::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_records_owner_id")
                            .from(Records::Table, Records::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Every report filters on owner and date range
        manager
            .create_index(
                Index::create()
                    .name("idx_records_owner_recorded_on")
                    .table(Records::Table)
                    .col(Records::OwnerId)
                    .col(Records::RecordedOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_records_vehicle_id")
                    .table(Records::Table)
                    .col(Records::VehicleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_records_owner_recorded_on")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_records_vehicle_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Records::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Records {
    Table,
    Id,
    VehicleId,
    OwnerId,
    SaleAmount,
    Commission,
    RecordedOn,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
