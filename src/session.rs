//! Session credential resolution.
//!
//! The OAuth exchange itself happens in an external collaborator that writes
//! rows into the `sessions` table. This service only resolves opaque bearer
//! tokens back into an identity: the [`SessionResolver`] trait is the seam,
//! and [`PgSessionResolver`] is the production implementation. Tests inject
//! their own resolver instead of standing up a provider.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::{db::DbPool, error::AppError};

/// The identity a session credential resolves to.
///
/// Attached to request extensions by the owner gate so handlers can see who
/// made the request.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Email address the external provider verified for this session.
    pub email: String,
}

/// Capability for turning an opaque session credential into an identity.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve a raw credential.
    ///
    /// Returns `Ok(None)` when the credential is unknown or the session has
    /// expired; the caller decides how to surface that.
    async fn resolve(&self, credential: &str) -> Result<Option<Identity>, AppError>;
}

/// Session resolver backed by the `sessions` table.
///
/// Tokens are stored as SHA-256 hashes, so the raw credential is hashed
/// before lookup and never touches the database in clear text. Expiry is
/// enforced in the query itself.
pub struct PgSessionResolver {
    pool: DbPool,
}

impl PgSessionResolver {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionResolver for PgSessionResolver {
    async fn resolve(&self, credential: &str) -> Result<Option<Identity>, AppError> {
        let token_hash = hash_token(credential);

        let email: Option<String> = sqlx::query_scalar(
            "SELECT email FROM sessions WHERE token_hash = $1 AND expires_at > NOW()",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(email.map(|email| Identity { email }))
    }
}

/// SHA-256 hash of a raw session token, hex encoded.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_stable_hex() {
        let hash = hash_token("session-token");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("session-token"));
        assert_ne!(hash, hash_token("other-token"));
    }
}
