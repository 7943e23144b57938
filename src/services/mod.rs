//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own the database queries, the referential guards, and the
//! aggregation reports.

pub mod category_service;
pub mod dashboard_service;
pub mod transaction_service;
