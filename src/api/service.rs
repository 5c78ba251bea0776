//! Forum service API endpoints
//!
//! Handles HTTP requests for database maintenance:
//! - POST /api/service/clear  - wipe every forum table
//! - GET  /api/service/status - row counts of posts, users, forums and threads
//! - GET  /api/service/health - database reachability

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::Status;
use crate::services::StatusServiceError;

/// Response for a successful clear
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
    pub rows: u64,
}

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Build the service router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clear", post(clear))
        .route("/status", get(status))
        .route("/health", get(health))
}

/// POST /api/service/clear - Remove all rows from every forum table
async fn clear(State(state): State<AppState>) -> Result<Json<ClearResponse>, ApiError> {
    let rows = state
        .status_service
        .try_clear_all()
        .await
        .map_err(|e| {
            tracing::error!("{}", e);
            ApiError::internal_error("Failed to clear forum tables")
        })?;

    Ok(Json(ClearResponse {
        cleared: true,
        rows,
    }))
}

/// GET /api/service/status - Row counts of the forum tables
///
/// Responds 503 with the partial counts when any count query failed, so an
/// unreachable database is never reported as an empty forum.
async fn status(State(state): State<AppState>) -> Result<Json<Status>, ApiError> {
    match state.status_service.try_get_status().await {
        Ok(status) => Ok(Json(status)),
        Err(StatusServiceError::Incomplete { status, failures }) => {
            let failed: Vec<&str> = failures.iter().map(|f| f.table.table_name()).collect();
            Err(ApiError::with_details(
                "SERVICE_UNAVAILABLE",
                "Failed to count some forum tables",
                serde_json::json!({
                    "status": status,
                    "failed": failed,
                }),
            ))
        }
        Err(e) => Err(ApiError::internal_error(e.to_string())),
    }
}

/// GET /api/service/health - Check that the database answers
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.pool.ping().await.map_err(|e| {
        tracing::warn!("Health check failed: {:#}", e);
        ApiError::service_unavailable("Database is unreachable")
    })?;

    Ok(Json(HealthResponse { status: "ok" }))
}
