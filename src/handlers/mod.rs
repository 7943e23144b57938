//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, query strings)
//! 2. Delegates to a service function
//! 3. Returns the enveloped JSON response

/// Authenticated identity echo
pub mod auth;
/// Category CRUD endpoints
pub mod categories;
/// Dashboard report endpoints
pub mod dashboard;
/// Service health endpoint
pub mod health;
/// Transaction CRUD endpoints
pub mod transactions;
