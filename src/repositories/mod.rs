//! # Repository Layer
//!
//! Repositories encapsulate SeaORM operations for users, firms, vehicles,
//! sale records and reports. Every method on an owned entity takes an
//! [`OwnerScope`](crate::scope::OwnerScope) and applies it inside the query predicate.

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, DbBackend,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use crate::models::record::{Column as RecordColumn, Entity as Record};

pub mod firm;
pub mod record;
pub mod report;
pub mod user;
pub mod vehicle;

pub use firm::{DeactivatedFirm, FirmRepository, FirmSelector};
pub use record::{NewRecord, RecordRepository, RecordRow};
pub use report::{
    DailySales, DailyTotal, FirmReport, FirmRevenue, PeriodRevenue, PeriodTotal, PlateReport, RangeSummary,
    ReportRepository,
};
pub use user::UserRepository;
pub use vehicle::{VehicleListing, VehicleRepository, VehicleSelector};

/// Inclusive calendar date range applied to `records.recorded_on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A filter exists only when both bounds are given; a single bound is ignored.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self { start, end }),
            _ => None,
        }
    }

    pub(crate) fn condition(self) -> Condition {
        Condition::all()
            .add(RecordColumn::RecordedOn.gte(self.start))
            .add(RecordColumn::RecordedOn.lte(self.end))
    }
}

/// Condition for an optional range; an absent range matches everything.
pub(crate) fn optional_range(range: Option<DateRange>) -> Condition {
    range.map(DateRange::condition).unwrap_or_else(Condition::all)
}

/// Money column as selected for the backend. SQLite keeps whole amounts as
/// INTEGER, so values are read back as REAL there.
pub(crate) fn money_expr(backend: DbBackend, column: RecordColumn) -> SimpleExpr {
    let expr = Expr::col((Record, column));
    match backend {
        DbBackend::Sqlite => Func::cast_as(expr, Alias::new("REAL")).into(),
        _ => expr.into(),
    }
}

/// `SUM` of a money column, cast the same way as [`money_expr`].
pub(crate) fn money_sum(backend: DbBackend, column: RecordColumn) -> SimpleExpr {
    let sum = Expr::col((Record, column)).sum();
    match backend {
        DbBackend::Sqlite => Func::cast_as(sum, Alias::new("REAL")).into(),
        _ => sum,
    }
}
