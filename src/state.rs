//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::infrastructure::cache::CacheService;

/// Application state shared across requests.
///
/// Everything is behind `Arc`, so cloning is cheap and each handler sees the
/// same service instances. The cache client is constructed once at startup
/// and injected here; tests substitute their own implementations without
/// touching global state.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Creates the shared state from its service components.
    pub fn new(
        link_service: Arc<LinkService>,
        stats_service: Arc<StatsService>,
        auth_service: Arc<AuthService>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            link_service,
            stats_service,
            auth_service,
            cache,
        }
    }
}
