//! Category data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Income/expense classification attached to every category and,
/// transitively, every transaction.
///
/// Maps to the Postgres `category_kind` enum and serializes as lowercase
/// JSON (`"income"` / `"expense"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "category_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// Represents a category record from the database.
///
/// `(name, kind)` pairs are unique, so the same name can exist once as an
/// income category and once as an expense category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a new category.
///
/// ```json
/// { "name": "Groceries", "kind": "expense" }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub kind: CategoryKind,
}

/// Request body for partially updating a category.
///
/// Only supplied fields change; unsupplied fields keep their prior values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
}

/// Response body for category endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            kind: category.kind,
            created_at: category.created_at,
        }
    }
}
