//! # Vehicle Handlers

use axum::{
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::{ApiError, validation_error};
use crate::handlers::types::{CreatedResponse, MessageResponse, OwnerQuery, required_text};
use crate::repositories::{VehicleListing, VehicleRepository, VehicleSelector};
use crate::scope::OwnerScope;
use crate::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[schema(example = "34 ABC 123")]
    pub plate: Option<String>,
    pub firm_id: Option<i32>,
    pub owner_id: Option<i64>,
}

/// Deactivation target; `id` wins when both are given
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateVehicleRequest {
    pub id: Option<i32>,
    pub plate: Option<String>,
    pub owner_id: Option<i64>,
}

/// List the owner's active vehicles
#[utoipa::path(
    get,
    path = "/vehicles",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Active vehicles ordered by plate", body = [VehicleListing]),
        (status = 400, description = "Missing ownerId", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<Vec<VehicleListing>>, ApiError> {
    let Query(query) = query?;
    let scope = OwnerScope::resolve(query.owner_id)?;

    let vehicles = VehicleRepository::new(&state.db).list_vehicles(scope).await?;
    Ok(Json(vehicles))
}

/// Add a vehicle under one of the owner's active firms
#[utoipa::path(
    post,
    path = "/vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle added", body = CreatedResponse),
        (status = 400, description = "Missing fields", body = ApiError),
        (status = 404, description = "Firm not found for this owner", body = ApiError),
        (status = 409, description = "Plate already registered by this owner", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(request) = payload?;
    let scope = OwnerScope::resolve(request.owner_id)?;
    let plate = required_text(request.plate.as_deref(), "plate")?;
    let firm_id = request
        .firm_id
        .ok_or_else(|| validation_error("firmId is required", json!({ "firmId": "required" })))?;

    let vehicle = VehicleRepository::new(&state.db)
        .add_vehicle(scope, plate, firm_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Vehicle added".to_string(),
            id: vehicle.id,
        }),
    ))
}

/// Deactivate a vehicle
#[utoipa::path(
    post,
    path = "/vehicles/deactivate",
    request_body = DeactivateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle deactivated", body = MessageResponse),
        (status = 400, description = "Neither id nor plate given", body = ApiError),
        (status = 404, description = "No such vehicle for this owner", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn deactivate_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<DeactivateVehicleRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    let scope = OwnerScope::resolve(request.owner_id)?;
    let selector = VehicleSelector::from_parts(request.id, request.plate.as_deref())?;

    VehicleRepository::new(&state.db)
        .deactivate_vehicle(scope, selector)
        .await?;

    Ok(Json(MessageResponse::new("Vehicle deactivated")))
}
