//! Transaction HTTP handlers.
//!
//! This module implements the transaction API endpoints:
//! - GET /transactions - Filtered, paginated listing
//! - POST /transactions - Create a transaction
//! - GET /transactions/{id} - Get one transaction
//! - PUT /transactions/{id} - Partially update a transaction
//! - DELETE /transactions/{id} - Delete a transaction

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::transaction::{
        CreateTransactionRequest, ListTransactionsParams, TransactionResponse,
        UpdateTransactionRequest,
    },
    response::{ApiResponse, PageMeta},
    services::transaction_service,
    state::AppState,
};

/// List transactions with filters and pagination.
///
/// # Query Parameters
///
/// - `page` (default 1), `limit` (default 20, capped at 100)
/// - `startDate` / `endDate` - inclusive calendar-date bounds
/// - `categoryId` - restrict to one category
/// - `type` - restrict to a category kind (`income` / `expense`)
///
/// # Response (200)
///
/// The page of transactions ordered by date descending, with
/// `meta.totalPages = ceil(total / limit)`.
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, AppError> {
    let page = transaction_service::resolve_page(params.page, params.limit);
    let (records, total) =
        transaction_service::list_transactions(&state.pool, &params, page).await?;

    let responses: Vec<TransactionResponse> = records.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::paged(
        responses,
        PageMeta::new(page.number, page.size, total),
    )))
}

/// Create a new transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "categoryId": "550e8400-e29b-41d4-a716-446655440000",
///   "amount": 25.99,
///   "description": "Weekly groceries",
///   "transactionDate": "2024-01-05"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the transaction joined with its category
/// - **400 Validation**: non-positive amount, empty description, or unknown
///   category
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = transaction_service::create_transaction(&state.pool, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(TransactionResponse::from(record))),
    ))
}

/// Get a transaction by id. Returns 404 when the id is unknown.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponse>>, AppError> {
    let record = transaction_service::get_transaction(&state.pool, transaction_id).await?;

    Ok(Json(ApiResponse::new(record.into())))
}

/// Partially update a transaction.
///
/// Any subset of the create fields may be supplied; unsupplied fields keep
/// their prior values. Returns the post-update record, or 404 when the id is
/// unknown.
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<ApiResponse<TransactionResponse>>, AppError> {
    let record =
        transaction_service::update_transaction(&state.pool, transaction_id, request).await?;

    Ok(Json(ApiResponse::new(record.into())))
}

/// Delete a transaction unconditionally by id.
///
/// Returns 404 when nothing was deleted.
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let deleted = transaction_service::delete_transaction(&state.pool, transaction_id).await?;

    if !deleted {
        return Err(AppError::NotFound("Transaction"));
    }

    Ok(Json(ApiResponse::new(
        serde_json::json!({ "deleted": true }),
    )))
}
