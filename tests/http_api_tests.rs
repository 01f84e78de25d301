//! End-to-end request flows through the router over an in-memory database.

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{get, json_post, send, setup_test_app};

#[tokio::test]
async fn register_then_login_returns_owner_id() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let (status, body) = send(
        &app,
        json_post(
            "/auth/register",
            json!({ "username": "ayse", "password": "s3cret" }),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_post(
            "/auth/login",
            json!({ "username": "ayse", "password": "s3cret" }),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"].as_i64(), Some(user_id));
    assert_eq!(body["user"]["username"], "ayse");
    assert!(body["user"].get("passwordHash").is_none());
    Ok(())
}

#[tokio::test]
async fn login_failures_are_unauthorized() -> Result<()> {
    let (app, _db) = setup_test_app().await?;
    send(
        &app,
        json_post(
            "/auth/register",
            json!({ "username": "ayse", "password": "s3cret" }),
        ),
    )
    .await?;

    let (wrong_password, _) = send(
        &app,
        json_post(
            "/auth/login",
            json!({ "username": "ayse", "password": "nope" }),
        ),
    )
    .await?;
    let (unknown_user, _) = send(
        &app,
        json_post(
            "/auth/login",
            json!({ "username": "nobody", "password": "s3cret" }),
        ),
    )
    .await?;

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_rejected() -> Result<()> {
    let (app, _db) = setup_test_app().await?;
    let payload = json!({ "username": "ayse", "password": "s3cret" });

    send(&app, json_post("/auth/register", payload.clone())).await?;
    let (status, body) = send(&app, json_post("/auth/register", payload)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["username"], "taken");
    Ok(())
}

#[tokio::test]
async fn sale_flow_from_firm_to_reports() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let (_, body) = send(
        &app,
        json_post(
            "/auth/register",
            json!({ "username": "ayse", "password": "s3cret" }),
        ),
    )
    .await?;
    let owner = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_post("/firms", json!({ "name": "acme", "ownerId": owner })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let firm_id = body["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        json_post("/firms", json!({ "name": " ACME ", "ownerId": owner })),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        json_post(
            "/vehicles",
            json!({ "plate": "34 abc 12", "firmId": firm_id, "ownerId": owner }),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let vehicle_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_post(
            "/records",
            json!({
                "vehicleId": vehicle_id,
                "ownerId": owner,
                "saleAmount": 1000,
                "date": "2024-01-15"
            }),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["commission"].as_f64(), Some(250.0));

    let (status, body) = send(&app, get(&format!("/records?ownerId={owner}"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["plate"], "34ABC12");
    assert_eq!(body[0]["firmName"], "ACME");
    assert_eq!(body[0]["date"], "2024-01-15");

    let (status, body) = send(
        &app,
        get(&format!(
            "/reports/plate?plate=34abc12&ownerId={owner}&grouping=ay"
        )),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grouping"], "month");
    assert_eq!(body["series"][0]["period"], "2024-01");
    assert_eq!(body["series"][0]["totalCommission"].as_f64(), Some(250.0));

    let (status, body) = send(
        &app,
        get(&format!(
            "/reports/range?ownerId={owner}&start=2024-01-01&end=2024-01-31"
        )),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["netRevenue"].as_f64(), Some(750.0));
    assert_eq!(body["perFirm"][0]["firm"], "ACME");
    Ok(())
}

#[tokio::test]
async fn firm_deactivation_reports_cascade_count() -> Result<()> {
    let (app, _db) = setup_test_app().await?;
    let (_, body) = send(
        &app,
        json_post(
            "/auth/register",
            json!({ "username": "ayse", "password": "s3cret" }),
        ),
    )
    .await?;
    let owner = body["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        json_post("/firms", json!({ "name": "acme", "ownerId": owner })),
    )
    .await?;
    let firm_id = body["id"].as_i64().unwrap();
    for plate in ["34AAA01", "34AAA02"] {
        send(
            &app,
            json_post(
                "/vehicles",
                json!({ "plate": plate, "firmId": firm_id, "ownerId": owner }),
            ),
        )
        .await?;
    }

    let (status, body) = send(
        &app,
        json_post("/firms/deactivate", json!({ "name": "Acme", "ownerId": owner })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Firm deactivated along with 2 vehicle(s)");

    let (_, vehicles) = send(&app, get(&format!("/vehicles?ownerId={owner}"))).await?;
    assert_eq!(vehicles.as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn record_validation_and_delete_semantics() -> Result<()> {
    let (app, _db) = setup_test_app().await?;
    let (_, body) = send(
        &app,
        json_post(
            "/auth/register",
            json!({ "username": "ayse", "password": "s3cret" }),
        ),
    )
    .await?;
    let owner = body["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        json_post(
            "/records",
            json!({ "vehicleId": 1, "ownerId": owner, "saleAmount": 0 }),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_post(
            "/records",
            json!({ "vehicleId": 1, "ownerId": owner, "saleAmount": 10, "date": "15/01/2024" }),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_post("/records/delete", json!({ "id": 12345, "ownerId": owner })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 0);
    Ok(())
}

#[tokio::test]
async fn range_report_requires_both_bounds() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let (status, body) = send(&app, get("/reports/range?ownerId=1&start=2024-01-01")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn health_reports_ok_with_live_database() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let (status, body) = send(&app, get("/healthz")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}
