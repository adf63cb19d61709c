//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, service wiring, and Axum
//! server lifecycle.

use crate::application::services::{AuthService, LinkService, ResolutionPolicy, StatsService};
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, MemoryCache, RedisCache};
use crate::infrastructure::persistence::{PgLinkRepository, PgOwnerRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Migrations
/// - Redis cache (or in-process MemoryCache fallback)
/// - Services and shared state
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
                Arc::new(MemoryCache::new(config.cache_ttl_seconds))
            }
        }
    } else {
        tracing::info!("Cache enabled (in-process)");
        Arc::new(MemoryCache::new(config.cache_ttl_seconds))
    };

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let owner_repository = Arc::new(PgOwnerRepository::new(pool.clone()));

    let policy = ResolutionPolicy {
        flush_interval: config.click_flush_interval,
        max_url_length: config.max_url_length,
        blocked_hosts: config.blocked_hosts.clone(),
    };

    let link_service = Arc::new(LinkService::new(
        link_repository.clone(),
        cache.clone(),
        policy,
    ));
    let stats_service = Arc::new(StatsService::new(link_repository, cache.clone()));
    let auth_service = Arc::new(AuthService::new(
        owner_repository,
        &config.token_signing_secret,
        config.token_expiry_minutes,
    ));

    let state = AppState::new(link_service, stats_service, auth_service, cache);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
