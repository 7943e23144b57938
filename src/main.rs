//! fintrack - Single-owner personal finance tracking API.
//!
//! A REST API for tracking income and expenses: CRUD over categories and
//! transactions plus monthly/annual aggregation reports, behind an
//! owner-only authorization gate and per-route-class rate limiting.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authorization**: opaque session tokens resolved against the sessions
//!   table, then compared to the single configured owner email
//! - **Rate limiting**: fixed-window counters, in-process or shared
//! - **Format**: JSON requests/responses in a uniform envelope
//!
//! # Startup Flow
//!
//! 1. Load and validate configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with the limiter and owner gate
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod money;
mod rate_limit;
mod response;
mod services;
mod session;
mod state;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::{
    config::RateLimitBackend,
    rate_limit::{RateLimitStore, RateLimiter, memory::MemoryStore, postgres::PgStore},
    session::{PgSessionResolver, SessionResolver},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration; a missing or empty owner email stops the process here.
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let server_port = config.server_port;

    // Counter store per configuration: process-local map or the shared
    // Postgres table.
    let store: Arc<dyn RateLimitStore> = match config.rate_limit_backend {
        RateLimitBackend::Memory => Arc::new(MemoryStore::new()),
        RateLimitBackend::Shared => Arc::new(PgStore::new(pool.clone())),
    };
    let limiter = RateLimiter::new(store, config.rate_limit_fail_open);
    tracing::info!(backend = ?config.rate_limit_backend, "Rate limiter ready");

    let sessions: Arc<dyn SessionResolver> = Arc::new(PgSessionResolver::new(pool.clone()));
    let state = AppState::new(pool, config, limiter, sessions);

    // Data and report routes share the general API budget. The rate limiter
    // layer is added last so it runs before the owner gate.
    let api_routes = Router::new()
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        .route(
            "/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route("/dashboard/summary", get(handlers::dashboard::summary))
        .route(
            "/dashboard/by-category",
            get(handlers::dashboard::by_category),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::owner_gate,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::api_rate_limit,
        ));

    // Authentication-adjacent routes get the strict budget.
    let auth_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::owner_gate,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::auth_rate_limit,
        ));

    let app = Router::new()
        // Public routes (no authorization required)
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes)
        .merge(auth_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Serve requests concurrently until the process is stopped.
    axum::serve(listener, app).await?;

    Ok(())
}
