//! Fixed-window rate limiting.
//!
//! Tracks request counts per client key within a fixed time window,
//! independently configurable per route class (a strict budget for
//! authentication-adjacent routes, a looser one for general API routes).
//!
//! # Algorithm
//!
//! Classic fixed window, not sliding window or token bucket. Each key holds
//! a counter and a window-end timestamp; the first request in a window (or
//! the first after the window elapsed) resets the counter, later requests
//! increment it until the budget is spent.
//!
//! # Known imprecision
//!
//! Fixed windows admit up to `2 x max_requests` requests across a window
//! boundary (the budget can be spent at the very end of one window and again
//! at the very start of the next). Callers depend on the exact threshold
//! behavior, so this is deliberately left as-is.
//!
//! # Backends
//!
//! The counter store is swappable via [`RateLimitStore`]: an in-process map
//! ([`memory::MemoryStore`]) or a shared Postgres counter table
//! ([`postgres::PgStore`]) that is safe across replicas.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;

/// Budget for one class of routes.
#[derive(Debug, Clone)]
pub struct RateLimitClass {
    /// Class name, used as the key namespace (e.g. "auth", "api").
    pub name: &'static str,
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window length in milliseconds.
    pub window_ms: i64,
}

impl RateLimitClass {
    /// Strict budget for authentication-adjacent routes.
    pub fn auth(config: &Config) -> Self {
        Self {
            name: "auth",
            max_requests: config.auth_rate_limit_max,
            window_ms: config.auth_rate_limit_window_ms,
        }
    }

    /// General budget for API routes.
    pub fn api(config: &Config) -> Self {
        Self {
            name: "api",
            max_requests: config.api_rate_limit_max,
            window_ms: config.api_rate_limit_window_ms,
        }
    }
}

/// Outcome of one rate-limit check.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Total budget for the window.
    pub limit: u32,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix milliseconds at which the current window resets.
    pub reset_at_ms: i64,
}

/// Counter store behind the limiter.
///
/// Both implementations satisfy the same contract: create-or-reset on an
/// elapsed window, deny with `remaining = 0` once the budget is spent, and
/// report the stored window end.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count a request against `key` and decide whether it is allowed.
    async fn check(
        &self,
        key: &str,
        window_ms: i64,
        max_requests: u32,
    ) -> Result<RateLimitDecision, StoreError>;
}

/// Failure talking to the counter store.
#[derive(Debug, thiserror::Error)]
#[error("rate limit store unavailable: {0}")]
pub struct StoreError(#[from] pub sqlx::Error);

/// Rate limiter over a swappable counter store.
///
/// Constructed once at startup and handed to the middleware through shared
/// state; the middleware never owns counters directly.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    fail_open: bool,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, fail_open: bool) -> Self {
        Self { store, fail_open }
    }

    /// Check one request for `client_key` under the given class budget.
    ///
    /// Keys are namespaced per class so the same client gets independent
    /// budgets on auth and API routes.
    ///
    /// When the store is unreachable the configured fallback policy applies:
    /// fail-open admits the request, fail-closed denies it. Either way the
    /// failure is logged, never propagated as a crash.
    pub async fn check(&self, class: &RateLimitClass, client_key: &str) -> RateLimitDecision {
        let key = format!("{}:{client_key}", class.name);

        match self
            .store
            .check(&key, class.window_ms, class.max_requests)
            .await
        {
            Ok(decision) => decision,
            Err(err) => {
                tracing::error!(
                    class = class.name,
                    client_key,
                    error = %err,
                    fail_open = self.fail_open,
                    "rate limit store check failed, applying fallback policy"
                );
                let now_ms = chrono::Utc::now().timestamp_millis();
                RateLimitDecision {
                    allowed: self.fail_open,
                    limit: class.max_requests,
                    remaining: if self.fail_open {
                        class.max_requests.saturating_sub(1)
                    } else {
                        0
                    },
                    reset_at_ms: now_ms + class.window_ms,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    struct FailingStore;

    #[async_trait]
    impl RateLimitStore for FailingStore {
        async fn check(
            &self,
            _key: &str,
            _window_ms: i64,
            _max_requests: u32,
        ) -> Result<RateLimitDecision, StoreError> {
            Err(StoreError(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn namespaces_keys_per_class() {
        let limiter = RateLimiter::new(Arc::new(MemoryStore::new()), true);
        let auth = RateLimitClass {
            name: "auth",
            max_requests: 1,
            window_ms: 60_000,
        };
        let api = RateLimitClass {
            name: "api",
            max_requests: 1,
            window_ms: 60_000,
        };

        assert!(limiter.check(&auth, "1.2.3.4:/x").await.allowed);
        assert!(!limiter.check(&auth, "1.2.3.4:/x").await.allowed);

        // Same client key, different class: independent budget.
        assert!(limiter.check(&api, "1.2.3.4:/x").await.allowed);
    }

    #[tokio::test]
    async fn fail_open_admits_on_store_failure() {
        let limiter = RateLimiter::new(Arc::new(FailingStore), true);
        let class = RateLimitClass {
            name: "api",
            max_requests: 10,
            window_ms: 60_000,
        };

        let decision = limiter.check(&class, "1.2.3.4:/x").await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 9);
    }

    #[tokio::test]
    async fn fail_closed_denies_on_store_failure() {
        let limiter = RateLimiter::new(Arc::new(FailingStore), false);
        let class = RateLimitClass {
            name: "api",
            max_requests: 10,
            window_ms: 60_000,
        };

        let decision = limiter.check(&class, "1.2.3.4:/x").await;
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }
}
