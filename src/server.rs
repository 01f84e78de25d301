//! # Server Configuration
//!
//! Router assembly, OpenAPI document and the serve loop for the plate ledger API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::propagate_trace_id;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/firms",
            get(handlers::firms::list_firms).post(handlers::firms::create_firm),
        )
        .route("/firms/deactivate", post(handlers::firms::deactivate_firm))
        .route(
            "/vehicles",
            get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
        )
        .route(
            "/vehicles/deactivate",
            post(handlers::vehicles::deactivate_vehicle),
        )
        .route(
            "/records",
            get(handlers::records::list_records).post(handlers::records::create_record),
        )
        .route("/records/delete", post(handlers::records::delete_record))
        .route("/reports/plate", get(handlers::reports::plate_report))
        .route("/reports/firm", get(handlers::reports::firm_report))
        .route("/reports/range", get(handlers::reports::range_report))
        .route("/reports/chart", get(handlers::reports::recent_days_chart))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(propagate_trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Starts the server and serves until Ctrl-C or SIGTERM
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config.bind_addr().context("Invalid server address")?;
    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let profile = state.config.profile.clone();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::firms::list_firms,
        crate::handlers::firms::create_firm,
        crate::handlers::firms::deactivate_firm,
        crate::handlers::vehicles::list_vehicles,
        crate::handlers::vehicles::create_vehicle,
        crate::handlers::vehicles::deactivate_vehicle,
        crate::handlers::records::create_record,
        crate::handlers::records::delete_record,
        crate::handlers::records::list_records,
        crate::handlers::reports::plate_report,
        crate::handlers::reports::firm_report,
        crate::handlers::reports::range_report,
        crate::handlers::reports::recent_days_chart,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::handlers::HealthResponse,
            crate::handlers::types::MessageResponse,
            crate::handlers::types::CreatedResponse,
            crate::handlers::auth::CredentialsRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::auth::UserSummary,
            crate::handlers::firms::FirmResponse,
            crate::handlers::firms::CreateFirmRequest,
            crate::handlers::firms::DeactivateFirmRequest,
            crate::handlers::vehicles::CreateVehicleRequest,
            crate::handlers::vehicles::DeactivateVehicleRequest,
            crate::handlers::records::CreateRecordRequest,
            crate::handlers::records::CreateRecordResponse,
            crate::handlers::records::DeleteRecordRequest,
            crate::handlers::records::DeleteRecordResponse,
            crate::repositories::VehicleListing,
            crate::repositories::RecordRow,
            crate::repositories::PeriodTotal,
            crate::repositories::DailyTotal,
            crate::repositories::PlateReport,
            crate::repositories::FirmReport,
            crate::repositories::FirmRevenue,
            crate::repositories::PeriodRevenue,
            crate::repositories::RangeSummary,
            crate::repositories::DailySales,
            crate::normalization::Granularity,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "firms", description = "Owner-scoped firms"),
        (name = "vehicles", description = "Owner-scoped vehicles"),
        (name = "records", description = "Sale ledger"),
        (name = "reports", description = "Aggregated sales reports"),
    ),
    info(
        title = "Plate Ledger API",
        description = "Vehicle plate sales and commission ledger",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
