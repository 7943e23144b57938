//! Transaction service - CRUD and filtered listing.
//!
//! Every logical write is a single statement (insert/update with a joining
//! CTE), and listing is the documented two-query shape: one count, one page.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_foreign_key_violation},
    models::transaction::{
        CreateTransactionRequest, ListTransactionsParams, TransactionRecord,
        UpdateTransactionRequest,
    },
    money,
};

const MAX_DESCRIPTION_LEN: usize = 255;
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Columns selected for every joined transaction read.
const SELECT_COLUMNS: &str = "t.id, t.category_id, c.name AS category_name, \
     c.kind AS category_kind, t.amount_cents, t.description, \
     t.transaction_date, t.created_at, t.updated_at";

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.trim().is_empty() {
        return Err(AppError::invalid(
            "description",
            "description must not be empty",
        ));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::invalid(
            "description",
            format!("description must be at most {MAX_DESCRIPTION_LEN} characters"),
        ));
    }
    Ok(())
}

/// One validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

/// Normalize raw pagination input: page at least 1, size clamped to
/// 1..=100, defaulting to 20.
pub fn resolve_page(page: Option<i64>, limit: Option<i64>) -> Page {
    Page {
        number: page.unwrap_or(1).max(1),
        size: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
    }
}

/// Create a transaction.
///
/// The decimal major-unit `amount` is converted to cents here, at the write
/// boundary. Category existence is enforced by the store's foreign key; a
/// violation surfaces as a validation error naming the category.
pub async fn create_transaction(
    pool: &DbPool,
    request: CreateTransactionRequest,
) -> Result<TransactionRecord, AppError> {
    validate_description(&request.description)?;
    let amount_cents = money::dollars_to_cents(request.amount)?;

    let sql = format!(
        r#"
        WITH inserted AS (
            INSERT INTO transactions (category_id, amount_cents, description, transaction_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT {columns}
        FROM inserted t
        JOIN categories c ON c.id = t.category_id
        "#,
        columns = SELECT_COLUMNS
    );

    let record = sqlx::query_as::<_, TransactionRecord>(&sql)
        .bind(request.category_id)
        .bind(amount_cents)
        .bind(request.description.trim())
        .bind(request.transaction_date)
        .fetch_one(pool)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::invalid("categoryId", "category does not exist")
            } else {
                err.into()
            }
        })?;

    Ok(record)
}

/// Get a transaction by id with its category, or `NotFound`.
pub async fn get_transaction(
    pool: &DbPool,
    transaction_id: Uuid,
) -> Result<TransactionRecord, AppError> {
    let sql = format!(
        "SELECT {columns} FROM transactions t \
         JOIN categories c ON c.id = t.category_id WHERE t.id = $1",
        columns = SELECT_COLUMNS
    );

    sqlx::query_as::<_, TransactionRecord>(&sql)
        .bind(transaction_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Transaction"))
}

/// List transactions matching the filters, newest date first.
///
/// Returns the requested page plus the total matching count so the caller
/// can compute the page count. Two queries by design: one count, one page.
pub async fn list_transactions(
    pool: &DbPool,
    params: &ListTransactionsParams,
    page: Page,
) -> Result<(Vec<TransactionRecord>, i64), AppError> {
    let mut count_query = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*) FROM transactions t JOIN categories c ON c.id = t.category_id WHERE 1=1",
    );
    push_filters(&mut count_query, params);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut page_query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {SELECT_COLUMNS} FROM transactions t \
         JOIN categories c ON c.id = t.category_id WHERE 1=1"
    ));
    push_filters(&mut page_query, params);
    page_query.push(" ORDER BY t.transaction_date DESC, t.created_at DESC");
    page_query.push(" LIMIT ").push_bind(page.size);
    page_query
        .push(" OFFSET ")
        .push_bind((page.number - 1) * page.size);

    let records = page_query
        .build_query_as::<TransactionRecord>()
        .fetch_all(pool)
        .await?;

    Ok((records, total))
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, params: &ListTransactionsParams) {
    if let Some(start_date) = params.start_date {
        builder
            .push(" AND t.transaction_date >= ")
            .push_bind(start_date);
    }
    if let Some(end_date) = params.end_date {
        builder
            .push(" AND t.transaction_date <= ")
            .push_bind(end_date);
    }
    if let Some(category_id) = params.category_id {
        builder.push(" AND t.category_id = ").push_bind(category_id);
    }
    if let Some(kind) = params.kind {
        builder.push(" AND c.kind = ").push_bind(kind);
    }
}

/// Partially update a transaction.
///
/// Only supplied fields change; COALESCE keeps the stored value for the
/// rest. Always bumps `updated_at`.
pub async fn update_transaction(
    pool: &DbPool,
    transaction_id: Uuid,
    request: UpdateTransactionRequest,
) -> Result<TransactionRecord, AppError> {
    if let Some(ref description) = request.description {
        validate_description(description)?;
    }
    let amount_cents = request.amount.map(money::dollars_to_cents).transpose()?;

    let sql = format!(
        r#"
        WITH updated AS (
            UPDATE transactions
            SET category_id = COALESCE($2, category_id),
                amount_cents = COALESCE($3, amount_cents),
                description = COALESCE($4, description),
                transaction_date = COALESCE($5, transaction_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
        )
        SELECT {columns}
        FROM updated t
        JOIN categories c ON c.id = t.category_id
        "#,
        columns = SELECT_COLUMNS
    );

    let record = sqlx::query_as::<_, TransactionRecord>(&sql)
        .bind(transaction_id)
        .bind(request.category_id)
        .bind(amount_cents)
        .bind(request.description.as_deref().map(str::trim))
        .bind(request.transaction_date)
        .fetch_optional(pool)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::invalid("categoryId", "category does not exist")
            } else {
                err.into()
            }
        })?
        .ok_or(AppError::NotFound("Transaction"))?;

    Ok(record)
}

/// Delete a transaction unconditionally by id.
///
/// Returns whether a row was actually removed. There is deliberately no
/// guard on the category side; the asymmetry with category deletion is part
/// of the contract.
pub async fn delete_transaction(pool: &DbPool, transaction_id: Uuid) -> Result<bool, AppError> {
    let deleted = sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(transaction_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_caps() {
        assert_eq!(resolve_page(None, None), Page { number: 1, size: 20 });
        assert_eq!(
            resolve_page(Some(3), Some(10)),
            Page {
                number: 3,
                size: 10
            }
        );
        // Cap, not error, on oversized limits.
        assert_eq!(resolve_page(Some(1), Some(500)).size, 100);
        assert_eq!(resolve_page(Some(0), Some(0)), Page { number: 1, size: 1 });
        assert_eq!(resolve_page(Some(-2), Some(-5)).number, 1);
    }

    #[test]
    fn rejects_bad_descriptions() {
        assert!(validate_description("").is_err());
        assert!(validate_description("  ").is_err());
        assert!(validate_description(&"d".repeat(256)).is_err());
        assert!(validate_description(&"d".repeat(255)).is_ok());
        assert!(validate_description("Weekly groceries").is_ok());
    }
}
