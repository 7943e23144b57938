//! In-process counter store.
//!
//! A mutex-guarded map of fixed-window counters. Counters live for the
//! lifetime of the process, are lost on restart, and are not shared across
//! replicas; use the Postgres store when more than one process serves
//! traffic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{RateLimitDecision, RateLimitStore, StoreError};

/// One key's window state.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at_ms: i64,
}

/// Mutex-guarded fixed-window counter map.
pub struct MemoryStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check with an explicit clock, so tests can step time deterministically.
    fn check_at(
        &self,
        key: &str,
        window_ms: i64,
        max_requests: u32,
        now_ms: i64,
    ) -> RateLimitDecision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // A fresh entry starts with a zero count so the increment below
        // counts this request like any other.
        let window = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at_ms: now_ms + window_ms,
        });

        // Stored window elapsed: reset in place.
        if now_ms >= window.reset_at_ms {
            window.count = 0;
            window.reset_at_ms = now_ms + window_ms;
        }

        // Budget spent: deny without incrementing further.
        if window.count >= max_requests {
            return RateLimitDecision {
                allowed: false,
                limit: max_requests,
                remaining: 0,
                reset_at_ms: window.reset_at_ms,
            };
        }

        window.count += 1;
        RateLimitDecision {
            allowed: true,
            limit: max_requests,
            remaining: max_requests.saturating_sub(window.count),
            reset_at_ms: window.reset_at_ms,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn check(
        &self,
        key: &str,
        window_ms: i64,
        max_requests: u32,
    ) -> Result<RateLimitDecision, StoreError> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        Ok(self.check_at(key, window_ms, max_requests, now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_budget_with_decreasing_remaining_then_denies() {
        let store = MemoryStore::new();
        let now = 1_000_000;

        // Exactly 5 requests succeed with remaining 4, 3, 2, 1, 0.
        for expected_remaining in (0u32..5).rev() {
            let decision = store.check_at("k", 60_000, 5, now);
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.reset_at_ms, now + 60_000);
        }

        // The 6th is denied without extending the window.
        let denied = store.check_at("k", 60_000, 5, now + 1);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_at_ms, now + 60_000);
    }

    #[test]
    fn resets_after_window_elapses() {
        let store = MemoryStore::new();
        let now = 1_000_000;

        for _ in 0..6 {
            store.check_at("k", 60_000, 5, now);
        }

        let after_reset = store.check_at("k", 60_000, 5, now + 60_000);
        assert!(after_reset.allowed);
        assert_eq!(after_reset.remaining, 4);
        assert_eq!(after_reset.reset_at_ms, now + 120_000);
    }

    #[test]
    fn keys_have_independent_budgets() {
        let store = MemoryStore::new();
        let now = 1_000_000;

        for _ in 0..5 {
            store.check_at("a", 60_000, 5, now);
        }
        assert!(!store.check_at("a", 60_000, 5, now).allowed);
        assert!(store.check_at("b", 60_000, 5, now).allowed);
    }

    #[test]
    fn denial_does_not_consume_budget_after_reset() {
        let store = MemoryStore::new();
        let now = 1_000_000;

        for _ in 0..20 {
            store.check_at("k", 60_000, 5, now);
        }

        // The denied calls above must not have inflated the counter carried
        // into the next window.
        let fresh = store.check_at("k", 60_000, 5, now + 60_001);
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 4);
    }
}
