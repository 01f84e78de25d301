//! # Firm Repository
//!
//! Owner-scoped firm lifecycle: creation, listing, lookup by name and the
//! transactional deactivation that cascades to the firm's vehicles.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

use crate::error::RepositoryError;
use crate::models::firm::{self, ActiveModel as FirmActiveModel, Entity as Firm, Model as FirmModel};
use crate::models::vehicle::{self, Entity as Vehicle};
use crate::normalization::normalize_firm_name;
use crate::scope::OwnerScope;

/// How a deactivation request names its firm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmSelector {
    Id(i32),
    Name(String),
}

impl FirmSelector {
    /// Prefer the id; fall back to the normalized name.
    pub fn from_parts(id: Option<i32>, name: Option<&str>) -> Result<Self, RepositoryError> {
        if let Some(id) = id {
            return Ok(Self::Id(id));
        }

        match name.map(normalize_firm_name) {
            Some(name) if !name.is_empty() => Ok(Self::Name(name)),
            _ => Err(RepositoryError::validation_error(
                "firm id or name is required",
            )),
        }
    }
}

/// Outcome of a firm deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeactivatedFirm {
    pub firm_id: i32,
    pub vehicles_deactivated: u64,
}

/// Repository for Firm database operations
pub struct FirmRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FirmRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an active firm for the owner.
    pub async fn add_firm(&self, scope: OwnerScope, name: &str) -> Result<FirmModel, RepositoryError> {
        let name = normalize_firm_name(name);
        if name.is_empty() {
            return Err(RepositoryError::validation_error("firm name is required"));
        }

        let firm = FirmActiveModel {
            name: Set(name),
            owner_id: Set(scope.id()),
            active: Set(true),
            ..Default::default()
        };

        let created = firm.insert(self.db).await.map_err(|err| {
            match RepositoryError::database_error(err) {
                RepositoryError::Conflict(_) => {
                    RepositoryError::Conflict("Firm already exists".to_string())
                }
                other => other,
            }
        })?;

        tracing::info!(owner_id = scope.id(), firm_id = created.id, "Firm created");
        Ok(created)
    }

    /// Active firms of the owner ordered by name.
    pub async fn list_firms(&self, scope: OwnerScope) -> Result<Vec<FirmModel>, RepositoryError> {
        Firm::find()
            .filter(firm::Column::OwnerId.eq(scope.id()))
            .filter(firm::Column::Active.eq(true))
            .order_by_asc(firm::Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Look up a firm by (normalized) name regardless of its active flag.
    pub async fn find_by_name(
        &self,
        scope: OwnerScope,
        name: &str,
    ) -> Result<Option<FirmModel>, RepositoryError> {
        Firm::find()
            .filter(firm::Column::OwnerId.eq(scope.id()))
            .filter(firm::Column::Name.eq(normalize_firm_name(name)))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Active firm of the owner by id.
    pub async fn find_active(
        &self,
        scope: OwnerScope,
        firm_id: i32,
    ) -> Result<Option<FirmModel>, RepositoryError> {
        Firm::find_by_id(firm_id)
            .filter(firm::Column::OwnerId.eq(scope.id()))
            .filter(firm::Column::Active.eq(true))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Deactivate a firm and every vehicle attached to it in one transaction.
    pub async fn deactivate_firm(
        &self,
        scope: OwnerScope,
        selector: FirmSelector,
    ) -> Result<DeactivatedFirm, RepositoryError> {
        let txn = self.db.begin().await.map_err(RepositoryError::database_error)?;

        let lookup = Firm::find().filter(firm::Column::OwnerId.eq(scope.id()));
        let lookup = match &selector {
            FirmSelector::Id(id) => lookup.filter(firm::Column::Id.eq(*id)),
            FirmSelector::Name(name) => lookup.filter(firm::Column::Name.eq(name.as_str())),
        };

        let firm = lookup
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found("Firm not found"))?;

        Firm::update_many()
            .col_expr(firm::Column::Active, Expr::value(false))
            .filter(firm::Column::Id.eq(firm.id))
            .filter(firm::Column::OwnerId.eq(scope.id()))
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        let cascaded = Vehicle::update_many()
            .col_expr(vehicle::Column::Active, Expr::value(false))
            .filter(vehicle::Column::FirmId.eq(firm.id))
            .filter(vehicle::Column::OwnerId.eq(scope.id()))
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit().await.map_err(RepositoryError::database_error)?;

        tracing::info!(
            owner_id = scope.id(),
            firm_id = firm.id,
            vehicles_deactivated = cascaded.rows_affected,
            "Firm deactivated"
        );

        Ok(DeactivatedFirm {
            firm_id: firm.id,
            vehicles_deactivated: cascaded.rows_affected,
        })
    }
}
