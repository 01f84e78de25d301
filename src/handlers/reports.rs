//! # Report Handlers
//!
//! Grouping accepts `day`/`gun`, `month`/`ay` and `year`/`yil`; unknown
//! values fall back to `day` and the response echoes the grouping used.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::error::{ApiError, validation_error};
use crate::handlers::types::{parse_optional_range, parse_required_range, required_text};
use crate::normalization::Granularity;
use crate::repositories::{DailySales, FirmReport, PlateReport, RangeSummary, ReportRepository};
use crate::scope::OwnerScope;
use crate::server::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PlateReportQuery {
    /// Plate in any spacing or case
    pub plate: Option<String>,
    pub owner_id: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// day | month | year
    pub grouping: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FirmReportQuery {
    /// Firm name in any case
    pub firm: Option<String>,
    pub owner_id: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// day | month | year
    pub grouping: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RangeReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    pub owner_id: Option<i64>,
    /// Window length; the server default applies when omitted
    pub days: Option<i64>,
}

/// Records and grouped totals for one plate
#[utoipa::path(
    get,
    path = "/reports/plate",
    params(PlateReportQuery),
    responses(
        (status = 200, description = "Plate report", body = PlateReport),
        (status = 400, description = "Missing plate/ownerId or malformed date", body = ApiError)
    ),
    tag = "reports"
)]
pub async fn plate_report(
    State(state): State<AppState>,
    query: Result<Query<PlateReportQuery>, QueryRejection>,
) -> Result<Json<PlateReport>, ApiError> {
    let Query(query) = query?;
    let scope = OwnerScope::resolve(query.owner_id)?;
    let plate = required_text(query.plate.as_deref(), "plate")?;
    let range = parse_optional_range(query.start.as_deref(), query.end.as_deref())?;
    let granularity = Granularity::parse(query.grouping.as_deref());

    let report = ReportRepository::new(&state.db)
        .plate_report(scope, plate, range, granularity)
        .await?;

    Ok(Json(report))
}

/// Day totals and grouped totals for one firm
#[utoipa::path(
    get,
    path = "/reports/firm",
    params(FirmReportQuery),
    responses(
        (status = 200, description = "Firm report", body = FirmReport),
        (status = 400, description = "Missing firm/ownerId or malformed date", body = ApiError),
        (status = 404, description = "Firm not found for this owner", body = ApiError)
    ),
    tag = "reports"
)]
pub async fn firm_report(
    State(state): State<AppState>,
    query: Result<Query<FirmReportQuery>, QueryRejection>,
) -> Result<Json<FirmReport>, ApiError> {
    let Query(query) = query?;
    let scope = OwnerScope::resolve(query.owner_id)?;
    let firm = required_text(query.firm.as_deref(), "firm")?;
    let range = parse_optional_range(query.start.as_deref(), query.end.as_deref())?;
    let granularity = Granularity::parse(query.grouping.as_deref());

    let report = ReportRepository::new(&state.db)
        .firm_report(scope, firm, range, granularity)
        .await?;

    Ok(Json(report))
}

/// Net revenue summary over a date range
#[utoipa::path(
    get,
    path = "/reports/range",
    params(RangeReportQuery),
    responses(
        (status = 200, description = "Range summary", body = RangeSummary),
        (status = 400, description = "Missing or malformed start/end", body = ApiError)
    ),
    tag = "reports"
)]
pub async fn range_report(
    State(state): State<AppState>,
    query: Result<Query<RangeReportQuery>, QueryRejection>,
) -> Result<Json<RangeSummary>, ApiError> {
    let Query(query) = query?;
    let scope = OwnerScope::resolve(query.owner_id)?;
    let range = parse_required_range(query.start.as_deref(), query.end.as_deref())?;

    let summary = ReportRepository::new(&state.db)
        .range_summary(scope, range)
        .await?;

    Ok(Json(summary))
}

/// Daily sales for the last `days` days
#[utoipa::path(
    get,
    path = "/reports/chart",
    params(ChartQuery),
    responses(
        (status = 200, description = "Daily sales, oldest first", body = [DailySales]),
        (status = 400, description = "Missing ownerId or days out of range", body = ApiError)
    ),
    tag = "reports"
)]
pub async fn recent_days_chart(
    State(state): State<AppState>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<Vec<DailySales>>, ApiError> {
    let Query(query) = query?;
    let scope = OwnerScope::resolve(query.owner_id)?;

    let days = match query.days {
        None => state.config.chart_default_days,
        Some(days) => u32::try_from(days).map_err(|_| {
            validation_error(
                "days must be between 0 and 3650",
                json!({ "days": days }),
            )
        })?,
    };

    let series = ReportRepository::new(&state.db)
        .recent_days_chart(scope, days, Utc::now().date_naive())
        .await?;

    Ok(Json(series))
}
