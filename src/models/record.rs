//! Sale record entity model
//!
//! Records are the ledger rows behind every report. The commission is derived
//! from the sale amount when the row is inserted and never updated.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub vehicle_id: i32,

    pub owner_id: i32,

    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub sale_amount: Decimal,

    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub commission: Decimal,

    /// Transaction date
    pub recorded_on: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
