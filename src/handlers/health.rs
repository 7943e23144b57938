//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, response::ApiResponse, state::AppState};

/// Health check payload: service status and database connectivity.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// `GET /health` - public, no owner gate. Probes the database with a trivial
/// query; an unreachable database surfaces as the standard internal error
/// envelope.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthStatus>>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(ApiResponse::new(HealthStatus {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    })))
}
