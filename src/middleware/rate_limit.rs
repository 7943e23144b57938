//! Per-route-class rate limiting middleware.
//!
//! Runs before the owner gate so unauthenticated floods are bounded too.
//! The client key is derived from the client network identifier plus the
//! matched route path, so distinct routes get independent budgets for the
//! same client.
//!
//! On allow, the current budget is exposed in `X-RateLimit-Limit`,
//! `X-RateLimit-Remaining` and `X-RateLimit-Reset` (Unix seconds) response
//! headers. On deny the request is rejected with 429 and the reset time.

use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, rate_limit::RateLimitClass, state::AppState};

/// Rate limit middleware for general API routes.
pub async fn api_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let class = state.api_class.clone();
    enforce(&state, &class, request, next).await
}

/// Rate limit middleware for authentication-adjacent routes.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let class = state.auth_class.clone();
    enforce(&state, &class, request, next).await
}

async fn enforce(
    state: &AppState,
    class: &RateLimitClass,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    let decision = state.limiter.check(class, &key).await;

    let reset_at_secs = decision.reset_at_ms / 1000;

    if !decision.allowed {
        return Err(AppError::RateLimited {
            reset_at: reset_at_secs,
        });
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining));
    headers.insert("X-RateLimit-Reset", HeaderValue::from(reset_at_secs));

    Ok(response)
}

/// Derive the limiter key: client network identifier plus route path.
///
/// The matched route template (e.g. `/transactions/{id}`) is preferred over
/// the raw URI so every id under one route shares a single budget.
fn client_key(request: &Request) -> String {
    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("unknown");

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str())
        .unwrap_or_else(|| request.uri().path());

    format!("{ip}:{path}")
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    use super::*;

    #[test]
    fn key_uses_first_forwarded_hop_and_path() {
        let request = HttpRequest::builder()
            .uri("/transactions?page=2")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "203.0.113.9:/transactions");
    }

    #[test]
    fn key_falls_back_to_unknown_client() {
        let request = HttpRequest::builder()
            .uri("/categories")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "unknown:/categories");
    }
}
