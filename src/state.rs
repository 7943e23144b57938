//! Shared application state.
//!
//! Everything with a process lifetime is constructed once in `main` and
//! handed to handlers and middleware by cloning this struct (the expensive
//! pieces are behind `Arc` or are pools, so clones are cheap handles).

use std::sync::Arc;

use crate::{
    config::Config,
    db::DbPool,
    rate_limit::{RateLimitClass, RateLimiter},
    session::SessionResolver,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub limiter: Arc<RateLimiter>,
    pub sessions: Arc<dyn SessionResolver>,
    pub auth_class: RateLimitClass,
    pub api_class: RateLimitClass,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: Config,
        limiter: RateLimiter,
        sessions: Arc<dyn SessionResolver>,
    ) -> Self {
        let auth_class = RateLimitClass::auth(&config);
        let api_class = RateLimitClass::api(&config);
        Self {
            pool,
            config: Arc::new(config),
            limiter: Arc::new(limiter),
            sessions,
            auth_class,
            api_class,
        }
    }
}
