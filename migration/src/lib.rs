//! Database migrations for the plate ledger.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_01_10_000001_create_users;
mod m2025_01_10_000002_create_firms;
mod m2025_01_10_000003_create_vehicles;
mod m2025_01_10_000004_create_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_10_000001_create_users::Migration),
            Box::new(m2025_01_10_000002_create_firms::Migration),
            Box::new(m2025_01_10_000003_create_vehicles::Migration),
            Box::new(m2025_01_10_000004_create_records::Migration),
        ]
    }
}
