//! Transaction data models and API request/response types.
//!
//! Amounts cross the write boundary as decimal major units and are stored as
//! integer cents (never floats). Every read joins the category so responses
//! carry the category's display name and kind.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryKind;

/// A transaction row joined with its category's name and kind.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_kind: CategoryKind,

    /// Amount in cents. Always positive (enforced by a CHECK constraint).
    pub amount_cents: i64,

    pub description: String,

    /// Calendar date of the transaction, no time component.
    pub transaction_date: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a transaction.
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
/// `amount` is in decimal major units and is converted to cents exactly once
/// here at the write boundary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub category_id: Uuid,
    pub amount: f64,
    pub description: String,
    pub transaction_date: NaiveDate,
}

/// Request body for partially updating a transaction.
///
/// Any subset of the create fields may be supplied; the rest keep their
/// prior values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub category_id: Option<Uuid>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

/// Query parameters for listing transactions.
///
/// Dates are inclusive bounds; `type` filters by the joined category's kind.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
}

/// Response body for transaction endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_kind: CategoryKind,
    pub amount_cents: i64,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            category_id: record.category_id,
            category_name: record.category_name,
            category_kind: record.category_kind,
            amount_cents: record.amount_cents,
            description: record.description,
            transaction_date: record.transaction_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
