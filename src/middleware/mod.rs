//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Rate-limit requests per client
//! - Authorize requests against the configured owner
//! - Short-circuit requests (429 / 401 / 403)

/// Owner gate authorization middleware
pub mod auth;
/// Per-route-class rate limiting middleware
pub mod rate_limit;
