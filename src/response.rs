//! Success response envelope.
//!
//! Every successful endpoint wraps its payload in the same envelope:
//!
//! ```json
//! { "success": true, "data": <T> }
//! ```
//!
//! Paginated list endpoints additionally carry a `meta` object with page,
//! limit, total and totalPages. Error responses use the mirror-image envelope
//! built in [`crate::error`].

use serde::Serialize;

/// Standard success envelope returned by every handler.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload without pagination metadata.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    /// Wrap a payload with pagination metadata.
    pub fn paged(data: T, meta: PageMeta) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    /// Build metadata for one page of a result set.
    ///
    /// `total_pages` is `ceil(total / limit)`; an empty result set yields
    /// zero pages.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }
}

fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn plain_envelope_omits_meta() {
        let envelope = ApiResponse::new(json!({"id": 1}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn paged_envelope_includes_meta() {
        let envelope = ApiResponse::paged(json!([]), PageMeta::new(1, 10, 25));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": [],
                "meta": {"page": 1, "limit": 10, "total": 25, "totalPages": 3}
            })
        );
    }
}
