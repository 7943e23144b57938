//! Dashboard report HTTP handlers.
//!
//! - GET /dashboard/summary - income/expense totals and balance
//! - GET /dashboard/by-category - per-category breakdown
//!
//! Both take `year` (required) and `month` (optional) query parameters.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    error::AppError,
    models::dashboard::{ByCategoryResponse, PeriodParams, SummaryResponse},
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

fn require_year(params: &PeriodParams) -> Result<i32, AppError> {
    params
        .year
        .ok_or_else(|| AppError::invalid("year", "year is required"))
}

/// Income/expense totals for a month or a whole year.
///
/// # Response (200)
///
/// ```json
/// {
///   "success": true,
///   "data": { "year": 2024, "month": 1, "incomeCents": 500, "expenseCents": 100, "balanceCents": 400 }
/// }
/// ```
///
/// A period with no transactions returns zero totals.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<ApiResponse<SummaryResponse>>, AppError> {
    let year = require_year(&params)?;
    let summary = dashboard_service::summary(&state.pool, year, params.month).await?;

    Ok(Json(ApiResponse::new(summary)))
}

/// Per-category totals for a month or a whole year, partitioned into income
/// and expense lists ordered by total descending.
pub async fn by_category(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<ApiResponse<ByCategoryResponse>>, AppError> {
    let year = require_year(&params)?;
    let breakdown = dashboard_service::by_category(&state.pool, year, params.month).await?;

    Ok(Json(ApiResponse::new(breakdown)))
}
