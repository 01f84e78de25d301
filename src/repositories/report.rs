//! # Report Repository
//!
//! Read-only aggregations over the sale ledger: per plate, per firm, per date
//! range and the recent-days chart. Grouping happens in SQL on a period key
//! (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`) built with the backend's date
//! formatting function. Sums are coalesced and rounded to cents in Rust.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, Order, SimpleExpr},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::commission::round_money;
use crate::error::RepositoryError;
use crate::models::record::{self, Entity as Record};
use crate::models::{firm, vehicle};
use crate::normalization::{Granularity, normalize_plate};
use crate::repositories::record::record_rows;
use crate::repositories::{DateRange, FirmRepository, RecordRow, money_sum, optional_range};
use crate::scope::OwnerScope;

/// Longest window the recent-days chart accepts.
pub const MAX_CHART_DAYS: u32 = 3650;

/// Sales and commission summed over one period.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    pub period: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_sales: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_commission: Decimal,
}

/// Day-level totals for a firm report.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_sales: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_commission: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlateReport {
    pub plate: String,
    pub list: Vec<RecordRow>,
    pub series: Vec<PeriodTotal>,
    pub grouping: Granularity,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirmReport {
    pub firm: String,
    pub list: Vec<DailyTotal>,
    pub series: Vec<PeriodTotal>,
    pub grouping: Granularity,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirmRevenue {
    pub firm: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub net_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRevenue {
    pub period: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub net_revenue: Decimal,
}

/// Net revenue (sales minus commission) over a mandatory date range.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub net_revenue: Decimal,
    pub per_firm: Vec<FirmRevenue>,
    pub monthly: Vec<PeriodRevenue>,
    pub yearly: Vec<PeriodRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub day: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub daily_sales: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct PeriodTotalRow {
    period: String,
    total_sales: Option<Decimal>,
    total_commission: Option<Decimal>,
}

impl PeriodTotalRow {
    fn into_total(self) -> PeriodTotal {
        PeriodTotal {
            period: self.period,
            total_sales: round_money(self.total_sales.unwrap_or_default()),
            total_commission: round_money(self.total_commission.unwrap_or_default()),
        }
    }

    fn into_revenue(self) -> PeriodRevenue {
        let total = self.into_total();
        PeriodRevenue {
            period: total.period,
            net_revenue: round_money(total.total_sales - total.total_commission),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct FirmTotalsRow {
    firm: String,
    total_sales: Option<Decimal>,
    total_commission: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    total_sales: Option<Decimal>,
    total_commission: Option<Decimal>,
}

/// Period key expression over `records.recorded_on` for the connected backend.
/// Only the Postgres and SQLite drivers are compiled in.
fn period_expr(backend: DbBackend, granularity: Granularity) -> SimpleExpr {
    if backend == DbBackend::Postgres {
        Expr::cust(format!(
            r#"to_char("records"."recorded_on", '{}')"#,
            granularity.to_char_pattern()
        ))
    } else {
        Expr::cust(format!(
            r#"strftime('{}', "records"."recorded_on")"#,
            granularity.strftime_pattern()
        ))
    }
}

/// Repository for report aggregations
pub struct ReportRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReportRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records of one plate plus their totals grouped by period.
    pub async fn plate_report(
        &self,
        scope: OwnerScope,
        plate: &str,
        range: Option<DateRange>,
        granularity: Granularity,
    ) -> Result<PlateReport, RepositoryError> {
        let plate = normalize_plate(plate);
        if plate.is_empty() {
            return Err(RepositoryError::validation_error("plate is required"));
        }

        let plate_filter = Condition::all().add(vehicle::Column::Plate.eq(plate.as_str()));

        let list = record_rows(scope, self.db.get_database_backend())
            .filter(plate_filter.clone())
            .filter(optional_range(range))
            .into_model::<RecordRow>()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .into_iter()
            .map(RecordRow::with_cents)
            .collect();

        let series = self
            .grouped_totals(scope, plate_filter, range, granularity, Order::Asc)
            .await?
            .into_iter()
            .map(PeriodTotalRow::into_total)
            .collect();

        Ok(PlateReport {
            plate,
            list,
            series,
            grouping: granularity,
        })
    }

    /// Day totals (newest first) and grouped series for one firm, active or not.
    pub async fn firm_report(
        &self,
        scope: OwnerScope,
        firm_name: &str,
        range: Option<DateRange>,
        granularity: Granularity,
    ) -> Result<FirmReport, RepositoryError> {
        if firm_name.trim().is_empty() {
            return Err(RepositoryError::validation_error("firm is required"));
        }

        let firm = FirmRepository::new(self.db)
            .find_by_name(scope, firm_name)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Firm not found"))?;

        let firm_filter = Condition::all().add(vehicle::Column::FirmId.eq(firm.id));

        let list = self
            .grouped_totals(scope, firm_filter.clone(), range, Granularity::Day, Order::Desc)
            .await?
            .into_iter()
            .map(|row| {
                let total = row.into_total();
                DailyTotal {
                    date: total.period,
                    total_sales: total.total_sales,
                    total_commission: total.total_commission,
                }
            })
            .collect();

        let series = self
            .grouped_totals(scope, firm_filter, range, granularity, Order::Asc)
            .await?
            .into_iter()
            .map(PeriodTotalRow::into_total)
            .collect();

        Ok(FirmReport {
            firm: firm.name,
            list,
            series,
            grouping: granularity,
        })
    }

    /// Net revenue over the range, broken down per firm, month and year.
    pub async fn range_summary(
        &self,
        scope: OwnerScope,
        range: DateRange,
    ) -> Result<RangeSummary, RepositoryError> {
        let backend = self.db.get_database_backend();
        let totals = Record::find()
            .select_only()
            .column_as(money_sum(backend, record::Column::SaleAmount), "total_sales")
            .column_as(money_sum(backend, record::Column::Commission), "total_commission")
            .filter(record::Column::OwnerId.eq(scope.id()))
            .filter(range.condition())
            .into_model::<TotalsRow>()
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        let net_revenue = totals
            .map(|row| {
                round_money(row.total_sales.unwrap_or_default())
                    - round_money(row.total_commission.unwrap_or_default())
            })
            .unwrap_or_default();

        let mut per_firm: Vec<FirmRevenue> = Record::find()
            .select_only()
            .column_as(firm::Column::Name, "firm")
            .column_as(money_sum(backend, record::Column::SaleAmount), "total_sales")
            .column_as(money_sum(backend, record::Column::Commission), "total_commission")
            .join(JoinType::InnerJoin, record::Relation::Vehicle.def())
            .join(JoinType::InnerJoin, vehicle::Relation::Firm.def())
            .filter(record::Column::OwnerId.eq(scope.id()))
            .filter(range.condition())
            .group_by(firm::Column::Name)
            .into_model::<FirmTotalsRow>()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .into_iter()
            .map(|row| FirmRevenue {
                firm: row.firm,
                net_revenue: round_money(
                    row.total_sales.unwrap_or_default() - row.total_commission.unwrap_or_default(),
                ),
            })
            .collect();
        per_firm.sort_by(|a, b| {
            b.net_revenue
                .cmp(&a.net_revenue)
                .then_with(|| a.firm.cmp(&b.firm))
        });

        let monthly = self
            .grouped_totals(scope, Condition::all(), Some(range), Granularity::Month, Order::Asc)
            .await?
            .into_iter()
            .map(PeriodTotalRow::into_revenue)
            .collect();

        let yearly = self
            .grouped_totals(scope, Condition::all(), Some(range), Granularity::Year, Order::Asc)
            .await?
            .into_iter()
            .map(PeriodTotalRow::into_revenue)
            .collect();

        Ok(RangeSummary {
            start: range.start,
            end: range.end,
            net_revenue: round_money(net_revenue),
            per_firm,
            monthly,
            yearly,
        })
    }

    /// Daily sales from `today - days` through today, oldest first.
    pub async fn recent_days_chart(
        &self,
        scope: OwnerScope,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<DailySales>, RepositoryError> {
        if days > MAX_CHART_DAYS {
            return Err(RepositoryError::validation_error(format!(
                "days must be between 0 and {MAX_CHART_DAYS}"
            )));
        }

        let cutoff = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| RepositoryError::validation_error("days reaches before the calendar"))?;

        let backend = self.db.get_database_backend();
        let day = period_expr(backend, Granularity::Day);

        let rows = Record::find()
            .select_only()
            .column_as(day.clone(), "period")
            .column_as(money_sum(backend, record::Column::SaleAmount), "total_sales")
            .column_as(money_sum(backend, record::Column::Commission), "total_commission")
            .filter(record::Column::OwnerId.eq(scope.id()))
            .filter(record::Column::RecordedOn.gte(cutoff))
            .group_by(day.clone())
            .order_by(day, Order::Asc)
            .into_model::<PeriodTotalRow>()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let total = row.into_total();
                DailySales {
                    day: total.period,
                    daily_sales: total.total_sales,
                }
            })
            .collect())
    }

    /// Owner's totals grouped by period, restricted by `extra` (vehicle columns)
    /// and an optional date range.
    async fn grouped_totals(
        &self,
        scope: OwnerScope,
        extra: Condition,
        range: Option<DateRange>,
        granularity: Granularity,
        order: Order,
    ) -> Result<Vec<PeriodTotalRow>, RepositoryError> {
        let backend = self.db.get_database_backend();
        let period = period_expr(backend, granularity);

        Record::find()
            .select_only()
            .column_as(period.clone(), "period")
            .column_as(money_sum(backend, record::Column::SaleAmount), "total_sales")
            .column_as(money_sum(backend, record::Column::Commission), "total_commission")
            .join(JoinType::InnerJoin, record::Relation::Vehicle.def())
            .filter(record::Column::OwnerId.eq(scope.id()))
            .filter(extra)
            .filter(optional_range(range))
            .group_by(period.clone())
            .order_by(period, order)
            .into_model::<PeriodTotalRow>()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
