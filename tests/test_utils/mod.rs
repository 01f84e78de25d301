//! Test utilities for database testing.
//!
//! In-memory SQLite databases with migrations applied, plus fixture helpers
//! that go through the repositories the API uses.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use plate_ledger::config::AppConfig;
use plate_ledger::models::{firm, record, vehicle};
use plate_ledger::repositories::{
    FirmRepository, NewRecord, RecordRepository, UserRepository, VehicleRepository,
};
use plate_ledger::scope::OwnerScope;
use plate_ledger::server::{AppState, create_app};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Router over a fresh in-memory database.
#[allow(dead_code)]
pub async fn setup_test_app() -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let state = AppState {
        db: db.clone(),
        config: Arc::new(AppConfig::default()),
    };
    Ok((create_app(state), db))
}

/// Creates a user with a placeholder hash and returns its scope.
#[allow(dead_code)]
pub async fn create_test_owner(db: &DatabaseConnection, username: &str) -> Result<OwnerScope> {
    let user = UserRepository::new(db)
        .create_user(username, "$argon2id$placeholder".to_string())
        .await?;
    Ok(OwnerScope::for_user(user.id))
}

#[allow(dead_code)]
pub async fn create_test_firm(
    db: &DatabaseConnection,
    scope: OwnerScope,
    name: &str,
) -> Result<firm::Model> {
    Ok(FirmRepository::new(db).add_firm(scope, name).await?)
}

#[allow(dead_code)]
pub async fn create_test_vehicle(
    db: &DatabaseConnection,
    scope: OwnerScope,
    plate: &str,
    firm_id: i32,
) -> Result<vehicle::Model> {
    Ok(VehicleRepository::new(db)
        .add_vehicle(scope, plate, firm_id)
        .await?)
}

/// Records a sale of `amount` (whole currency units) on the given date.
#[allow(dead_code)]
pub async fn create_test_record(
    db: &DatabaseConnection,
    scope: OwnerScope,
    vehicle_id: i32,
    amount: i64,
    recorded_on: &str,
) -> Result<record::Model> {
    create_test_sale(db, scope, vehicle_id, Decimal::from(amount), recorded_on).await
}

/// Records a sale of an exact decimal amount on the given date.
#[allow(dead_code)]
pub async fn create_test_sale(
    db: &DatabaseConnection,
    scope: OwnerScope,
    vehicle_id: i32,
    amount: Decimal,
    recorded_on: &str,
) -> Result<record::Model> {
    Ok(RecordRepository::new(db)
        .add_record(
            scope,
            NewRecord {
                vehicle_id,
                sale_amount: amount,
                recorded_on: Some(date(recorded_on)),
            },
        )
        .await?)
}

#[allow(dead_code)]
pub fn dec(raw: &str) -> Decimal {
    raw.parse().unwrap()
}

#[allow(dead_code)]
pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

/// Sends a request through the router and returns status plus JSON body.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

#[allow(dead_code)]
pub fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}
