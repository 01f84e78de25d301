//! # Vehicle Repository
//!
//! Owner-scoped vehicle lifecycle. A vehicle can only be attached to an
//! active firm of the same owner.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, sea_query::Expr,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::RepositoryError;
use crate::models::firm;
use crate::models::vehicle::{
    self, ActiveModel as VehicleActiveModel, Entity as Vehicle, Model as VehicleModel,
};
use crate::normalization::normalize_plate;
use crate::repositories::FirmRepository;
use crate::scope::OwnerScope;

/// How a deactivation request names its vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleSelector {
    Id(i32),
    Plate(String),
}

impl VehicleSelector {
    /// Prefer the id; fall back to the normalized plate.
    pub fn from_parts(id: Option<i32>, plate: Option<&str>) -> Result<Self, RepositoryError> {
        if let Some(id) = id {
            return Ok(Self::Id(id));
        }

        match plate.map(normalize_plate) {
            Some(plate) if !plate.is_empty() => Ok(Self::Plate(plate)),
            _ => Err(RepositoryError::validation_error(
                "vehicle id or plate is required",
            )),
        }
    }
}

/// Active vehicle joined with its firm's name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListing {
    pub id: i32,
    pub plate: String,
    pub firm_id: i32,
    pub firm_name: Option<String>,
}

/// Repository for Vehicle database operations
pub struct VehicleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VehicleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a plate under one of the owner's active firms.
    pub async fn add_vehicle(
        &self,
        scope: OwnerScope,
        plate: &str,
        firm_id: i32,
    ) -> Result<VehicleModel, RepositoryError> {
        let plate = normalize_plate(plate);
        if plate.is_empty() {
            return Err(RepositoryError::validation_error("plate is required"));
        }

        FirmRepository::new(self.db)
            .find_active(scope, firm_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Firm not found"))?;

        let vehicle = VehicleActiveModel {
            plate: Set(plate),
            firm_id: Set(firm_id),
            owner_id: Set(scope.id()),
            active: Set(true),
            ..Default::default()
        };

        let created = vehicle.insert(self.db).await.map_err(|err| {
            match RepositoryError::database_error(err) {
                RepositoryError::Conflict(_) => {
                    RepositoryError::Conflict("Plate already exists".to_string())
                }
                other => other,
            }
        })?;

        tracing::info!(
            owner_id = scope.id(),
            firm_id,
            vehicle_id = created.id,
            "Vehicle created"
        );
        Ok(created)
    }

    /// Active vehicles of the owner ordered by plate, with firm names.
    pub async fn list_vehicles(
        &self,
        scope: OwnerScope,
    ) -> Result<Vec<VehicleListing>, RepositoryError> {
        Vehicle::find()
            .select_only()
            .column(vehicle::Column::Id)
            .column(vehicle::Column::Plate)
            .column(vehicle::Column::FirmId)
            .column_as(firm::Column::Name, "firm_name")
            .join(JoinType::LeftJoin, vehicle::Relation::Firm.def())
            .filter(vehicle::Column::OwnerId.eq(scope.id()))
            .filter(vehicle::Column::Active.eq(true))
            .order_by_asc(vehicle::Column::Plate)
            .into_model::<VehicleListing>()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Vehicle of the owner by id, active or not.
    pub async fn find_owned(
        &self,
        scope: OwnerScope,
        vehicle_id: i32,
    ) -> Result<Option<VehicleModel>, RepositoryError> {
        Vehicle::find_by_id(vehicle_id)
            .filter(vehicle::Column::OwnerId.eq(scope.id()))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Clear the active flag of one of the owner's vehicles.
    pub async fn deactivate_vehicle(
        &self,
        scope: OwnerScope,
        selector: VehicleSelector,
    ) -> Result<(), RepositoryError> {
        let update = Vehicle::update_many()
            .col_expr(vehicle::Column::Active, Expr::value(false))
            .filter(vehicle::Column::OwnerId.eq(scope.id()));
        let update = match &selector {
            VehicleSelector::Id(id) => update.filter(vehicle::Column::Id.eq(*id)),
            VehicleSelector::Plate(plate) => {
                update.filter(vehicle::Column::Plate.eq(plate.as_str()))
            }
        };

        let result = update
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("Vehicle not found"));
        }

        tracing::info!(owner_id = scope.id(), ?selector, "Vehicle deactivated");
        Ok(())
    }
}
