//! # Sale Record Handlers

use axum::{
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, validation_error};
use crate::handlers::types::{parse_date_param, parse_optional_range};
use crate::repositories::{NewRecord, RecordRepository, RecordRow};
use crate::scope::OwnerScope;
use crate::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub vehicle_id: Option<i32>,
    pub owner_id: Option<i64>,
    /// Number or numeric string
    #[schema(value_type = Option<f64>, example = 1000.0)]
    pub sale_amount: Option<Decimal>,
    /// `YYYY-MM-DD`; today when omitted
    #[schema(example = "2024-01-15")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRecordResponse {
    #[schema(example = "Record added")]
    pub message: String,
    pub id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 250.0)]
    pub commission: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordRequest {
    pub id: Option<i32>,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordResponse {
    pub message: String,
    /// 0 when nothing matched
    pub deleted_count: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListRecordsQuery {
    pub owner_id: Option<i64>,
    /// Inclusive lower bound, applied together with `end`
    pub start: Option<String>,
    /// Inclusive upper bound, applied together with `start`
    pub end: Option<String>,
}

/// Record a sale; the commission is computed by the server
#[utoipa::path(
    post,
    path = "/records",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record added", body = CreateRecordResponse),
        (status = 400, description = "Missing fields or non-positive amount", body = ApiError),
        (status = 404, description = "Vehicle not found for this owner", body = ApiError)
    ),
    tag = "records"
)]
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateRecordResponse>), ApiError> {
    let Json(request) = payload?;
    let scope = OwnerScope::resolve(request.owner_id)?;
    let vehicle_id = request.vehicle_id.ok_or_else(|| {
        validation_error("vehicleId is required", json!({ "vehicleId": "required" }))
    })?;
    let sale_amount = request.sale_amount.ok_or_else(|| {
        validation_error("saleAmount is required", json!({ "saleAmount": "required" }))
    })?;
    let recorded_on = parse_date_param(request.date.as_deref(), "date")?;

    let record = RecordRepository::new(&state.db)
        .add_record(
            scope,
            NewRecord {
                vehicle_id,
                sale_amount,
                recorded_on,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRecordResponse {
            message: "Record added".to_string(),
            id: record.id,
            commission: record.commission,
        }),
    ))
}

/// Delete one of the owner's records
#[utoipa::path(
    post,
    path = "/records/delete",
    request_body = DeleteRecordRequest,
    responses(
        (status = 200, description = "Delete processed", body = DeleteRecordResponse),
        (status = 400, description = "Missing fields", body = ApiError)
    ),
    tag = "records"
)]
pub async fn delete_record(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRecordRequest>, JsonRejection>,
) -> Result<Json<DeleteRecordResponse>, ApiError> {
    let Json(request) = payload?;
    let scope = OwnerScope::resolve(request.owner_id)?;
    let record_id = request
        .id
        .ok_or_else(|| validation_error("id is required", json!({ "id": "required" })))?;

    let deleted_count = RecordRepository::new(&state.db)
        .delete_record(scope, record_id)
        .await?;

    let message = if deleted_count == 0 {
        "No matching record"
    } else {
        "Record deleted"
    };

    Ok(Json(DeleteRecordResponse {
        message: message.to_string(),
        deleted_count,
    }))
}

/// List the owner's records, newest first
#[utoipa::path(
    get,
    path = "/records",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Records with plate and firm name", body = [RecordRow]),
        (status = 400, description = "Missing ownerId or malformed date", body = ApiError)
    ),
    tag = "records"
)]
pub async fn list_records(
    State(state): State<AppState>,
    query: Result<Query<ListRecordsQuery>, QueryRejection>,
) -> Result<Json<Vec<RecordRow>>, ApiError> {
    let Query(query) = query?;
    let scope = OwnerScope::resolve(query.owner_id)?;
    let range = parse_optional_range(query.start.as_deref(), query.end.as_deref())?;

    let records = RecordRepository::new(&state.db)
        .list_records(scope, range)
        .await?;

    Ok(Json(records))
}
