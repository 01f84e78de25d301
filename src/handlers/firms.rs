//! # Firm Handlers

use axum::{
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::types::{CreatedResponse, MessageResponse, OwnerQuery, required_text};
use crate::models::firm::Model as FirmModel;
use crate::repositories::{FirmRepository, FirmSelector};
use crate::scope::OwnerScope;
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FirmResponse {
    pub id: i32,
    #[schema(example = "ACME LOGISTICS")]
    pub name: String,
    pub active: bool,
}

impl From<FirmModel> for FirmResponse {
    fn from(model: FirmModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            active: model.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFirmRequest {
    #[schema(example = "Acme Logistics")]
    pub name: Option<String>,
    pub owner_id: Option<i64>,
}

/// Deactivation target; `id` wins when both are given
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateFirmRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub owner_id: Option<i64>,
}

/// List the owner's active firms
#[utoipa::path(
    get,
    path = "/firms",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Active firms ordered by name", body = [FirmResponse]),
        (status = 400, description = "Missing ownerId", body = ApiError)
    ),
    tag = "firms"
)]
pub async fn list_firms(
    State(state): State<AppState>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<Vec<FirmResponse>>, ApiError> {
    let Query(query) = query?;
    let scope = OwnerScope::resolve(query.owner_id)?;

    let firms = FirmRepository::new(&state.db).list_firms(scope).await?;

    Ok(Json(firms.into_iter().map(FirmResponse::from).collect()))
}

/// Add a firm
#[utoipa::path(
    post,
    path = "/firms",
    request_body = CreateFirmRequest,
    responses(
        (status = 201, description = "Firm added", body = CreatedResponse),
        (status = 400, description = "Missing fields", body = ApiError),
        (status = 409, description = "Firm name already used by this owner", body = ApiError)
    ),
    tag = "firms"
)]
pub async fn create_firm(
    State(state): State<AppState>,
    payload: Result<Json<CreateFirmRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(request) = payload?;
    let scope = OwnerScope::resolve(request.owner_id)?;
    let name = required_text(request.name.as_deref(), "name")?;

    let firm = FirmRepository::new(&state.db).add_firm(scope, name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Firm added".to_string(),
            id: firm.id,
        }),
    ))
}

/// Deactivate a firm and all of its vehicles
#[utoipa::path(
    post,
    path = "/firms/deactivate",
    request_body = DeactivateFirmRequest,
    responses(
        (status = 200, description = "Firm and its vehicles deactivated", body = MessageResponse),
        (status = 400, description = "Neither id nor name given", body = ApiError),
        (status = 404, description = "No such firm for this owner", body = ApiError)
    ),
    tag = "firms"
)]
pub async fn deactivate_firm(
    State(state): State<AppState>,
    payload: Result<Json<DeactivateFirmRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    let scope = OwnerScope::resolve(request.owner_id)?;
    let selector = FirmSelector::from_parts(request.id, request.name.as_deref())?;

    let outcome = FirmRepository::new(&state.db)
        .deactivate_firm(scope, selector)
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "Firm deactivated along with {} vehicle(s)",
        outcome.vehicles_deactivated
    ))))
}
