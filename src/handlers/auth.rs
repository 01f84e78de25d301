//! # Account Handlers
//!
//! Registration and login. Login answers with the user id that the other
//! endpoints take as `ownerId`.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::credentials::{hash_password, verify_password};
use crate::error::{ApiError, RepositoryError, unauthorized, validation_error};
use crate::handlers::types::{CreatedResponse, required_text};
use crate::repositories::UserRepository;
use crate::server::AppState;

/// Credentials payload shared by register and login
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "ayse")]
    pub username: Option<String>,
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub user: UserSummary,
}

fn password_field(password: Option<&str>) -> Result<&str, ApiError> {
    match password {
        Some(password) if !password.is_empty() => Ok(password),
        _ => Err(validation_error(
            "password is required",
            json!({ "password": "required" }),
        )),
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered", body = CreatedResponse),
        (status = 400, description = "Missing fields or username taken", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(request) = payload?;
    let username = required_text(request.username.as_deref(), "username")?;
    let password = password_field(request.password.as_deref())?;

    let password_hash = hash_password(password.to_string()).await?;

    let user = UserRepository::new(&state.db)
        .create_user(username, password_hash)
        .await
        .map_err(|err| match err {
            RepositoryError::Conflict(_) => validation_error(
                "Username is already taken",
                json!({ "username": "taken" }),
            ),
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "User registered".to_string(),
            id: user.id,
        }),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ApiError),
        (status = 401, description = "Unknown user or wrong password", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let username = required_text(request.username.as_deref(), "username")?;
    let password = password_field(request.password.as_deref())?;

    let user = UserRepository::new(&state.db)
        .find_by_username(username)
        .await?
        .ok_or_else(|| unauthorized(Some("Invalid username or password")))?;

    let accepted = verify_password(password.to_string(), user.password_hash.clone()).await?;
    if !accepted {
        tracing::info!(user_id = user.id, "Login rejected");
        return Err(unauthorized(Some("Invalid username or password")));
    }

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: UserSummary {
            id: user.id,
            username: user.username,
        },
    }))
}
