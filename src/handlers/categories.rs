//! Category HTTP handlers.
//!
//! This module implements the category API endpoints:
//! - POST /categories - Create a category
//! - GET /categories - List all categories
//! - GET /categories/{id} - Get one category
//! - PUT /categories/{id} - Partially update a category
//! - DELETE /categories/{id} - Delete a category (guarded)

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest},
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

/// Create a new category.
///
/// # Request Body
///
/// ```json
/// { "name": "Groceries", "kind": "expense" }
/// ```
///
/// # Response
///
/// - **201 Created**: the created category
/// - **409 Conflict**: a category with this name and kind already exists
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = category_service::create_category(&state.pool, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CategoryResponse::from(category))),
    ))
}

/// List all categories, newest first.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, AppError> {
    let categories = category_service::list_categories(&state.pool).await?;

    let responses: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// Get a category by id. Returns 404 when the id is unknown.
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponse>>, AppError> {
    let category = category_service::get_category(&state.pool, category_id).await?;

    Ok(Json(ApiResponse::new(category.into())))
}

/// Partially update a category.
///
/// Only supplied fields change; the rest keep their prior values. Returns
/// the post-update record, or 404 when the id is unknown.
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, AppError> {
    let category = category_service::update_category(&state.pool, category_id, request).await?;

    Ok(Json(ApiResponse::new(category.into())))
}

/// Delete a category.
///
/// Refused with 409 while any transaction still references the category;
/// the transactions must be deleted or moved first.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    category_service::delete_category(&state.pool, category_id).await?;

    Ok(Json(ApiResponse::new(
        serde_json::json!({ "deleted": true }),
    )))
}
