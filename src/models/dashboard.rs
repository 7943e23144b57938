//! Dashboard report types.
//!
//! Reports never materialize per-transaction detail; they carry exact
//! integer cent totals computed by grouped sums in the database.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryKind;

/// Query parameters shared by both dashboard endpoints.
///
/// `year` is required but modeled as an `Option` so its absence surfaces as
/// a validation error inside the envelope rather than a raw extractor
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Income/expense totals for a period.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub balance_cents: i64,
}

/// One category's total within a period, as grouped by the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryTotalRow {
    pub category_id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub total_cents: i64,
    pub transaction_count: i64,
}

/// One category's total as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub total_cents: i64,
    pub transaction_count: i64,
}

impl From<CategoryTotalRow> for CategoryTotal {
    fn from(row: CategoryTotalRow) -> Self {
        Self {
            category_id: row.category_id,
            name: row.name,
            total_cents: row.total_cents,
            transaction_count: row.transaction_count,
        }
    }
}

/// Per-category breakdown partitioned by kind.
///
/// Each list is ordered by total amount descending; categories without a
/// matching transaction in the period do not appear.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByCategoryResponse {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub income: Vec<CategoryTotal>,
    pub expense: Vec<CategoryTotal>,
}
