//! Aggregation engine - monthly and annual financial reports.
//!
//! Reports are grouped sums over a date-bounded transaction set, computed in
//! the database as exact i64 cent arithmetic. No per-transaction detail is
//! materialized for the caller.

use chrono::NaiveDate;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        category::CategoryKind,
        dashboard::{ByCategoryResponse, CategoryTotal, CategoryTotalRow, SummaryResponse},
    },
};

/// Resolve a reporting period to inclusive calendar-date bounds.
///
/// With a month, the bounds are the first and last day of that month (month
/// length computed, leap years included); without one, the whole year.
pub fn period_bounds(year: i32, month: Option<u32>) -> Result<(NaiveDate, NaiveDate), AppError> {
    match month {
        Some(month) => {
            let start = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| AppError::invalid("month", "month must be between 1 and 12"))?;
            // Day before the first of the next month.
            let next_month = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)
            }
            .ok_or_else(|| AppError::invalid("year", "year is out of range"))?;
            let end = next_month.pred_opt().unwrap_or(start);
            Ok((start, end))
        }
        None => {
            let start = NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| AppError::invalid("year", "year is out of range"))?;
            let end = NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| AppError::invalid("year", "year is out of range"))?;
            Ok((start, end))
        }
    }
}

/// Income/expense totals and balance for the period.
///
/// A period with no matching transactions yields zero totals, not an error.
pub async fn summary(
    pool: &DbPool,
    year: i32,
    month: Option<u32>,
) -> Result<SummaryResponse, AppError> {
    let (start, end) = period_bounds(year, month)?;

    let rows: Vec<(CategoryKind, i64)> = sqlx::query_as(
        r#"
        SELECT c.kind, SUM(t.amount_cents)::bigint AS total_cents
        FROM transactions t
        JOIN categories c ON c.id = t.category_id
        WHERE t.transaction_date BETWEEN $1 AND $2
        GROUP BY c.kind
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let (income_cents, expense_cents) = sum_by_kind(rows);

    Ok(SummaryResponse {
        year,
        month,
        income_cents,
        expense_cents,
        balance_cents: income_cents - expense_cents,
    })
}

/// Per-category totals for the period, partitioned into income and expense
/// lists.
///
/// Only categories with at least one matching transaction appear. The SQL
/// orders by total descending with the category id as a deterministic
/// tiebreak, and the partition preserves that order within each list.
pub async fn by_category(
    pool: &DbPool,
    year: i32,
    month: Option<u32>,
) -> Result<ByCategoryResponse, AppError> {
    let (start, end) = period_bounds(year, month)?;

    let rows = sqlx::query_as::<_, CategoryTotalRow>(
        r#"
        SELECT c.id AS category_id,
               c.name,
               c.kind,
               SUM(t.amount_cents)::bigint AS total_cents,
               COUNT(*)::bigint AS transaction_count
        FROM transactions t
        JOIN categories c ON c.id = t.category_id
        WHERE t.transaction_date BETWEEN $1 AND $2
        GROUP BY c.id, c.name, c.kind
        ORDER BY total_cents DESC, c.id
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let (income, expense) = partition_by_kind(rows);

    Ok(ByCategoryResponse {
        year,
        month,
        income,
        expense,
    })
}

/// Fold grouped kind totals into `(income, expense)` cents, defaulting an
/// absent kind to zero.
fn sum_by_kind(rows: Vec<(CategoryKind, i64)>) -> (i64, i64) {
    let mut income_cents = 0;
    let mut expense_cents = 0;
    for (kind, total) in rows {
        match kind {
            CategoryKind::Income => income_cents += total,
            CategoryKind::Expense => expense_cents += total,
        }
    }
    (income_cents, expense_cents)
}

/// Split ordered grouped rows into income and expense lists, keeping the
/// incoming order.
fn partition_by_kind(rows: Vec<CategoryTotalRow>) -> (Vec<CategoryTotal>, Vec<CategoryTotal>) {
    let mut income = Vec::new();
    let mut expense = Vec::new();
    for row in rows {
        match row.kind {
            CategoryKind::Income => income.push(row.into()),
            CategoryKind::Expense => expense.push(row.into()),
        }
    }
    (income, expense)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn month_bounds_use_real_month_lengths() {
        assert_eq!(
            period_bounds(2024, Some(1)).unwrap(),
            (
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
            )
        );
        assert_eq!(
            period_bounds(2024, Some(4)).unwrap().1,
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
        );
        assert_eq!(
            period_bounds(2024, Some(12)).unwrap().1,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn february_bounds_are_leap_aware() {
        assert_eq!(
            period_bounds(2024, Some(2)).unwrap().1,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            period_bounds(2023, Some(2)).unwrap().1,
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn year_bounds_span_jan_through_dec() {
        assert_eq!(
            period_bounds(2024, None).unwrap(),
            (
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
            )
        );
    }

    #[test]
    fn invalid_month_is_a_validation_error() {
        assert!(matches!(
            period_bounds(2024, Some(0)),
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            period_bounds(2024, Some(13)),
            Err(AppError::Validation { .. })
        ));
    }

    /// A year of activity: salary and groceries in January, one more expense
    /// in June.
    fn ledger() -> Vec<(NaiveDate, CategoryKind, i64)> {
        let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        vec![
            (day(1, 10), CategoryKind::Income, 500),
            (day(1, 20), CategoryKind::Expense, 100),
            (day(6, 15), CategoryKind::Expense, 150),
        ]
    }

    /// Totals the ledger the way the grouped query does: date-bounded, then
    /// summed per kind.
    fn totals_within(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
        sum_by_kind(
            ledger()
                .into_iter()
                .filter(|(day, _, _)| (start..=end).contains(day))
                .map(|(_, kind, cents)| (kind, cents))
                .collect(),
        )
    }

    #[test]
    fn monthly_summary_counts_only_that_month() {
        let (start, end) = period_bounds(2024, Some(1)).unwrap();
        let (income, expense) = totals_within(start, end);

        assert_eq!(income, 500);
        assert_eq!(expense, 100);
        assert_eq!(income - expense, 400);
    }

    #[test]
    fn annual_summary_spans_every_month() {
        let (start, end) = period_bounds(2024, None).unwrap();
        let (income, expense) = totals_within(start, end);

        assert_eq!(income, 500);
        assert_eq!(expense, 250);
        assert_eq!(income - expense, 250);
    }

    #[test]
    fn empty_period_sums_to_zero() {
        let (start, end) = period_bounds(2024, Some(3)).unwrap();
        assert_eq!(totals_within(start, end), (0, 0));
    }

    fn row(kind: CategoryKind, total_cents: i64) -> CategoryTotalRow {
        CategoryTotalRow {
            category_id: Uuid::new_v4(),
            name: format!("cat-{total_cents}"),
            kind,
            total_cents,
            transaction_count: 1,
        }
    }

    #[test]
    fn partition_splits_by_kind_and_keeps_order() {
        // Input arrives ordered by total descending, as the SQL produces it.
        let rows = vec![
            row(CategoryKind::Expense, 700),
            row(CategoryKind::Income, 500),
            row(CategoryKind::Expense, 300),
        ];

        let (income, expense) = partition_by_kind(rows);

        assert_eq!(income.len(), 1);
        assert_eq!(income[0].total_cents, 500);
        assert_eq!(expense.len(), 2);
        assert_eq!(expense[0].total_cents, 700);
        assert_eq!(expense[1].total_cents, 300);
    }

    #[test]
    fn partition_of_nothing_is_two_empty_lists() {
        let (income, expense) = partition_by_kind(Vec::new());
        assert!(income.is_empty());
        assert!(expense.is_empty());
    }

    #[test]
    fn partition_carries_names_and_transaction_counts() {
        let rows = vec![
            CategoryTotalRow {
                category_id: Uuid::new_v4(),
                name: "Salary".to_string(),
                kind: CategoryKind::Income,
                total_cents: 500,
                transaction_count: 1,
            },
            CategoryTotalRow {
                category_id: Uuid::new_v4(),
                name: "Groceries".to_string(),
                kind: CategoryKind::Expense,
                total_cents: 100,
                transaction_count: 2,
            },
        ];

        let (income, expense) = partition_by_kind(rows);

        assert_eq!(income[0].name, "Salary");
        assert_eq!(income[0].total_cents, 500);
        assert_eq!(expense[0].name, "Groceries");
        assert_eq!(expense[0].transaction_count, 2);
    }
}
