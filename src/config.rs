//! Application configuration management.
//!
//! Configuration comes from environment variables, deserialized with `envy`
//! into a type-safe struct. Anything the core depends on to behave correctly
//! (the owner email above all) is validated here so a misconfigured process
//! refuses to start instead of misbehaving per request.

use serde::Deserialize;

/// Which backend the rate limiter counts requests in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Process-local counter map. Lost on restart, not shared across
    /// replicas.
    Memory,
    /// Counter table in Postgres, shared by every replica.
    Shared,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `OWNER_EMAIL` (required): the single identity allowed past the owner gate
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `AUTH_RATE_LIMIT_MAX` / `AUTH_RATE_LIMIT_WINDOW_MS` (optional): budget
///   for authentication-adjacent routes, defaults to 5 requests per 60s
/// - `API_RATE_LIMIT_MAX` / `API_RATE_LIMIT_WINDOW_MS` (optional): budget
///   for general API routes, defaults to 100 requests per 60s
/// - `RATE_LIMIT_BACKEND` (optional): `memory` (default) or `shared`
/// - `RATE_LIMIT_FAIL_OPEN` (optional): whether requests are allowed when the
///   shared store is unreachable, defaults to true
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    pub owner_email: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_auth_max")]
    pub auth_rate_limit_max: u32,

    #[serde(default = "default_window_ms")]
    pub auth_rate_limit_window_ms: i64,

    #[serde(default = "default_api_max")]
    pub api_rate_limit_max: u32,

    #[serde(default = "default_window_ms")]
    pub api_rate_limit_window_ms: i64,

    #[serde(default = "default_backend")]
    pub rate_limit_backend: RateLimitBackend,

    #[serde(default = "default_fail_open")]
    pub rate_limit_fail_open: bool,
}

fn default_port() -> u16 {
    3000
}

fn default_auth_max() -> u32 {
    5
}

fn default_api_max() -> u32 {
    100
}

fn default_window_ms() -> i64 {
    60_000
}

fn default_backend() -> RateLimitBackend {
    RateLimitBackend::Memory
}

fn default_fail_open() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first if one exists, then deserializes the
    /// environment and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value cannot be
    /// parsed, the owner email is empty, or a rate-limit budget is zero.
    pub fn from_env() -> anyhow::Result<Self> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.owner_email.trim().is_empty() {
            anyhow::bail!("OWNER_EMAIL must not be empty");
        }
        if self.auth_rate_limit_max == 0 || self.api_rate_limit_max == 0 {
            anyhow::bail!("rate limit maxima must be greater than zero");
        }
        if self.auth_rate_limit_window_ms <= 0 || self.api_rate_limit_window_ms <= 0 {
            anyhow::bail!("rate limit windows must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_env() -> Vec<(String, String)> {
        vec![
            (
                "DATABASE_URL".to_string(),
                "postgres://localhost/fintrack".to_string(),
            ),
            ("OWNER_EMAIL".to_string(), "owner@example.com".to_string()),
        ]
    }

    #[test]
    fn applies_documented_defaults() {
        let config = envy::from_iter::<_, Config>(base_env()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.auth_rate_limit_max, 5);
        assert_eq!(config.auth_rate_limit_window_ms, 60_000);
        assert_eq!(config.api_rate_limit_max, 100);
        assert_eq!(config.api_rate_limit_window_ms, 60_000);
        assert_eq!(config.rate_limit_backend, RateLimitBackend::Memory);
        assert!(config.rate_limit_fail_open);
    }

    #[test]
    fn owner_email_is_required() {
        let env = vec![(
            "DATABASE_URL".to_string(),
            "postgres://localhost/fintrack".to_string(),
        )];
        assert!(envy::from_iter::<_, Config>(env).is_err());
    }

    #[test]
    fn blank_owner_email_fails_validation() {
        let mut env = base_env();
        env[1].1 = "   ".to_string();
        let config = envy::from_iter::<_, Config>(env).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_shared_backend() {
        let mut env = base_env();
        env.push(("RATE_LIMIT_BACKEND".to_string(), "shared".to_string()));
        let config = envy::from_iter::<_, Config>(env).unwrap();
        assert_eq!(config.rate_limit_backend, RateLimitBackend::Shared);
    }

    #[test]
    fn zero_budget_fails_validation() {
        let mut env = base_env();
        env.push(("API_RATE_LIMIT_MAX".to_string(), "0".to_string()));
        let config = envy::from_iter::<_, Config>(env).unwrap();
        assert!(config.validate().is_err());
    }
}
