//! Category service - CRUD plus the delete guard.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_foreign_key_violation, is_unique_violation},
    models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest},
};

const MAX_NAME_LEN: usize = 100;

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::invalid("name", "name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::invalid(
            "name",
            format!("name must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

/// The delete guard's decision, given the number of transactions still
/// referencing the category.
fn referencing_guard(referencing: i64) -> Result<(), AppError> {
    if referencing > 0 {
        return Err(AppError::Conflict(format!(
            "category still has {referencing} transaction(s)"
        )));
    }
    Ok(())
}

/// Create a new category.
///
/// # Errors
///
/// - `Validation`: empty or over-long name
/// - `Conflict`: a category with this name and kind already exists
pub async fn create_category(
    pool: &DbPool,
    request: CreateCategoryRequest,
) -> Result<Category, AppError> {
    validate_name(&request.name)?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, kind)
        VALUES ($1, $2)
        RETURNING id, name, kind, created_at
        "#,
    )
    .bind(request.name.trim())
    .bind(request.kind)
    .fetch_one(pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict("a category with this name and kind already exists".to_string())
        } else {
            err.into()
        }
    })?;

    Ok(category)
}

/// List all categories, newest first.
pub async fn list_categories(pool: &DbPool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, kind, created_at FROM categories ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Get a category by id, or `NotFound`.
pub async fn get_category(pool: &DbPool, category_id: Uuid) -> Result<Category, AppError> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, kind, created_at FROM categories WHERE id = $1",
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Category"))
}

/// Partially update a category.
///
/// Only supplied fields change; COALESCE keeps the stored value for the
/// rest.
pub async fn update_category(
    pool: &DbPool,
    category_id: Uuid,
    request: UpdateCategoryRequest,
) -> Result<Category, AppError> {
    if let Some(ref name) = request.name {
        validate_name(name)?;
    }

    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = COALESCE($2, name),
            kind = COALESCE($3, kind)
        WHERE id = $1
        RETURNING id, name, kind, created_at
        "#,
    )
    .bind(category_id)
    .bind(request.name.as_deref().map(str::trim))
    .bind(request.kind)
    .fetch_optional(pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict("a category with this name and kind already exists".to_string())
        } else {
            err.into()
        }
    })?
    .ok_or(AppError::NotFound("Category"))?;

    Ok(category)
}

/// Delete a category, refusing while transactions still reference it.
///
/// The count-then-delete sequence has a documented race: a transaction
/// created between the two statements would slip past the guard. The
/// foreign key on `transactions.category_id` is the actual safety net, so a
/// lost race surfaces as the same `Conflict` instead of a dangling
/// reference.
pub async fn delete_category(pool: &DbPool, category_id: Uuid) -> Result<(), AppError> {
    let referencing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await?;

    referencing_guard(referencing)?;

    let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(pool)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::Conflict("category still has transactions".to_string())
            } else {
                err.into()
            }
        })?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("Category"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_overlong_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
        assert!(validate_name(&"x".repeat(100)).is_ok());
        assert!(validate_name("Groceries").is_ok());
    }

    #[test]
    fn delete_guard_refuses_while_transactions_reference_the_category() {
        match referencing_guard(3) {
            Err(AppError::Conflict(message)) => {
                assert_eq!(message, "category still has 3 transaction(s)");
            }
            other => panic!("expected a conflict, got {other:?}"),
        }
    }

    #[test]
    fn delete_guard_passes_an_unreferenced_category() {
        assert!(referencing_guard(0).is_ok());
    }
}
