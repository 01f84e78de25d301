//! # Record Repository
//!
//! The sale ledger. Commission is computed here at insertion time and is
//! never accepted from callers.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::commission::{commission_for, round_money, validate_sale_amount};
use crate::error::RepositoryError;
use crate::models::record::{
    self, ActiveModel as RecordActiveModel, Entity as Record, Model as RecordModel,
};
use crate::models::{firm, vehicle};
use crate::repositories::{DateRange, VehicleRepository, money_expr, optional_range};
use crate::scope::OwnerScope;

/// Input for a new sale record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub vehicle_id: i32,
    pub sale_amount: Decimal,
    /// Today (UTC) when absent
    pub recorded_on: Option<NaiveDate>,
}

/// Sale record joined with its plate and firm name.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub id: i32,
    pub vehicle_id: i32,
    pub owner_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub sale_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub commission: Decimal,
    #[serde(rename = "date")]
    pub recorded_on: NaiveDate,
    pub plate: String,
    pub firm_name: Option<String>,
}

impl RecordRow {
    /// Money is stored in cents; SQLite hands it back through `f64`.
    pub(crate) fn with_cents(mut self) -> Self {
        self.sale_amount = round_money(self.sale_amount);
        self.commission = round_money(self.commission);
        self
    }
}

/// Select over the owner's records joined with vehicle plate and firm name,
/// newest first.
pub(crate) fn record_rows(scope: OwnerScope, backend: DbBackend) -> Select<Record> {
    Record::find()
        .select_only()
        .column(record::Column::Id)
        .column(record::Column::VehicleId)
        .column(record::Column::OwnerId)
        .column_as(money_expr(backend, record::Column::SaleAmount), "sale_amount")
        .column_as(money_expr(backend, record::Column::Commission), "commission")
        .column(record::Column::RecordedOn)
        .column_as(vehicle::Column::Plate, "plate")
        .column_as(firm::Column::Name, "firm_name")
        .join(JoinType::InnerJoin, record::Relation::Vehicle.def())
        .join(JoinType::LeftJoin, vehicle::Relation::Firm.def())
        .filter(record::Column::OwnerId.eq(scope.id()))
        .order_by_desc(record::Column::RecordedOn)
        .order_by_desc(record::Column::Id)
}

/// Repository for sale record operations
pub struct RecordRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RecordRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a sale against one of the owner's vehicles.
    pub async fn add_record(
        &self,
        scope: OwnerScope,
        new_record: NewRecord,
    ) -> Result<RecordModel, RepositoryError> {
        let sale_amount = validate_sale_amount(new_record.sale_amount)?;

        VehicleRepository::new(self.db)
            .find_owned(scope, new_record.vehicle_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Vehicle not found"))?;

        let commission = commission_for(sale_amount);
        let recorded_on = new_record
            .recorded_on
            .unwrap_or_else(|| Utc::now().date_naive());

        let record = RecordActiveModel {
            id: NotSet,
            vehicle_id: Set(new_record.vehicle_id),
            owner_id: Set(scope.id()),
            sale_amount: Set(sale_amount),
            commission: Set(commission),
            recorded_on: Set(recorded_on),
        };

        // Only the key is read back; money columns are returned as written
        let inserted = Record::insert(record)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        let created = RecordModel {
            id: inserted.last_insert_id,
            vehicle_id: new_record.vehicle_id,
            owner_id: scope.id(),
            sale_amount,
            commission,
            recorded_on,
        };

        tracing::info!(
            owner_id = scope.id(),
            vehicle_id = created.vehicle_id,
            record_id = created.id,
            %commission,
            "Sale recorded"
        );
        Ok(created)
    }

    /// Hard-delete one of the owner's records. Returns the number of rows removed (0 or 1).
    pub async fn delete_record(
        &self,
        scope: OwnerScope,
        record_id: i32,
    ) -> Result<u64, RepositoryError> {
        let result = Record::delete_many()
            .filter(record::Column::Id.eq(record_id))
            .filter(record::Column::OwnerId.eq(scope.id()))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::info!(
            owner_id = scope.id(),
            record_id,
            deleted = result.rows_affected,
            "Record delete requested"
        );
        Ok(result.rows_affected)
    }

    /// The owner's records, optionally limited to an inclusive date range.
    pub async fn list_records(
        &self,
        scope: OwnerScope,
        range: Option<DateRange>,
    ) -> Result<Vec<RecordRow>, RepositoryError> {
        record_rows(scope, self.db.get_database_backend())
            .filter(optional_range(range))
            .into_model::<RecordRow>()
            .all(self.db)
            .await
            .map(|rows| rows.into_iter().map(RecordRow::with_cents).collect())
            .map_err(RepositoryError::database_error)
    }
}
