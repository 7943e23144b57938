//! Owner gate authorization middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the session token from the Authorization header
//! 2. Resolve it to an identity via the session resolver
//! 3. Compare the identity's email against the configured owner email
//! 4. Inject the identity into the request for downstream handlers
//!
//! Exactly one identity is authorized for the lifetime of the deployed
//! configuration; there is no role or permission lookup beyond the single
//! email comparison. The check is stateless per request: no authorization
//! decision is cached across requests.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    session::{Identity, SessionResolver},
    state::AppState,
};

/// Authorize a raw session credential against the owner email.
///
/// # Flow
///
/// 1. Resolve the credential; an unknown or expired session is
///    `Unauthorized` (401)
/// 2. Compare the resolved email to the owner email; a mismatch is
///    `Forbidden` (403). The comparison is case-sensitive.
/// 3. On match, return the identity for attachment to the request
pub async fn authorize(
    resolver: &dyn SessionResolver,
    credential: &str,
    owner_email: &str,
) -> Result<Identity, AppError> {
    let identity = resolver
        .resolve(credential)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if identity.email != owner_email {
        return Err(AppError::Forbidden);
    }

    Ok(identity)
}

/// Owner gate middleware function.
///
/// Expected header format:
/// ```text
/// Authorization: Bearer <session token>
/// ```
///
/// A missing or malformed header is `Unauthorized`; the rest of the decision
/// is [`authorize`].
pub async fn owner_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let identity = authorize(state.sessions.as_ref(), token, &state.config.owner_email).await?;

    // Handlers can extract this with Extension<Identity>.
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    /// Resolver over a fixed token -> email table.
    struct StaticResolver {
        sessions: HashMap<String, String>,
    }

    impl StaticResolver {
        fn with_session(token: &str, email: &str) -> Self {
            let mut sessions = HashMap::new();
            sessions.insert(token.to_string(), email.to_string());
            Self { sessions }
        }
    }

    #[async_trait]
    impl SessionResolver for StaticResolver {
        async fn resolve(&self, credential: &str) -> Result<Option<Identity>, AppError> {
            Ok(self.sessions.get(credential).map(|email| Identity {
                email: email.clone(),
            }))
        }
    }

    #[tokio::test]
    async fn unresolvable_credential_is_unauthorized() {
        let resolver = StaticResolver::with_session("tok", "owner@example.com");
        let result = authorize(&resolver, "unknown", "owner@example.com").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn wrong_identity_is_forbidden() {
        let resolver = StaticResolver::with_session("tok", "intruder@example.com");
        let result = authorize(&resolver, "tok", "owner@example.com").await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn email_comparison_is_case_sensitive() {
        let resolver = StaticResolver::with_session("tok", "Owner@Example.com");
        let result = authorize(&resolver, "tok", "owner@example.com").await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn matching_owner_passes_with_identity() {
        let resolver = StaticResolver::with_session("tok", "owner@example.com");
        let identity = authorize(&resolver, "tok", "owner@example.com")
            .await
            .unwrap();
        assert_eq!(identity.email, "owner@example.com");
    }
}
