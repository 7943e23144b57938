//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! together with their API request/response types. Wire types serialize as
//! camelCase to match the HTTP contract.

/// Income/expense categories
pub mod category;
/// Dashboard report types
pub mod dashboard;
/// Ledger transactions
pub mod transaction;
