//! Shared counter store backed by Postgres.
//!
//! Counters live in the `rate_limit_counters` table so every replica sees
//! the same budget. Each check is a single atomic UPSERT: an elapsed window
//! is reset in place, otherwise the count is incremented. The window expiry
//! is written by the same statement that creates or resets the row, so it is
//! set exactly once per window; if two replicas race on "first increment"
//! the loser performs one redundant reset to the same value, which is
//! harmless.
//!
//! Unlike the in-process store, the counter keeps incrementing past the
//! limit while requests are denied. The decision contract is unchanged:
//! denied requests report `remaining = 0` and the stored window end.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{RateLimitDecision, RateLimitStore, StoreError};
use crate::db::DbPool;

/// Fixed-window counter store in the shared database.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for PgStore {
    async fn check(
        &self,
        key: &str,
        window_ms: i64,
        max_requests: u32,
    ) -> Result<RateLimitDecision, StoreError> {
        let (count, reset_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO rate_limit_counters (key, count, reset_at)
            VALUES ($1, 1, NOW() + ($2::bigint * interval '1 millisecond'))
            ON CONFLICT (key) DO UPDATE SET
                count = CASE
                    WHEN rate_limit_counters.reset_at <= NOW() THEN 1
                    ELSE rate_limit_counters.count + 1
                END,
                reset_at = CASE
                    WHEN rate_limit_counters.reset_at <= NOW()
                        THEN NOW() + ($2::bigint * interval '1 millisecond')
                    ELSE rate_limit_counters.reset_at
                END
            RETURNING count, reset_at
            "#,
        )
        .bind(key)
        .bind(window_ms)
        .fetch_one(&self.pool)
        .await?;

        let limit = i64::from(max_requests);
        Ok(RateLimitDecision {
            allowed: count <= limit,
            limit: max_requests,
            remaining: limit.saturating_sub(count).try_into().unwrap_or(0),
            reset_at_ms: reset_at.timestamp_millis(),
        })
    }
}
