#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use linkly::application::services::{AuthService, LinkService, ResolutionPolicy, StatsService};
use linkly::domain::entities::{Link, NewLink, NewOwner, Owner};
use linkly::domain::repositories::{LinkRepository, OwnerRepository};
use linkly::error::AppError;
use linkly::infrastructure::cache::MemoryCache;
use linkly::state::AppState;

pub const TEST_SIGNING_SECRET: &str = "integration-test-signing-secret";

/// In-memory link store implementing the repository contract, including the
/// unique-key conflict and the forward-only click checkpoint.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// The durable click count as the persistent store sees it, bypassing
    /// any cache. `None` when the link doesn't exist.
    pub fn durable_click_count(&self, short_key: &str) -> Option<i64> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_key == short_key)
            .map(|l| l.click_count)
    }

    /// Seeds a link directly into the store, as if created earlier.
    pub fn put_link(&self, short_key: &str, target_url: &str, owner_id: i64, click_count: i64) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.links.lock().unwrap().push(Link::new(
            id,
            short_key.to_string(),
            target_url.to_string(),
            owner_id,
            click_count,
            Utc::now(),
        ));
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();

        if links.iter().any(|l| l.short_key == new_link.short_key) {
            return Err(AppError::conflict(
                "Short key already exists",
                json!({ "short_key": new_link.short_key }),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let link = Link::new(
            id,
            new_link.short_key,
            new_link.target_url,
            new_link.owner_id,
            0,
            Utc::now(),
        );
        links.push(link.clone());

        Ok(link)
    }

    async fn find_by_short_key(&self, short_key: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_key == short_key)
            .cloned())
    }

    async fn find_by_target_url(
        &self,
        target_url: &str,
        owner_id: i64,
    ) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.target_url == target_url && l.owner_id == owner_id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn update_click_count(&self, short_key: &str, count: i64) -> Result<(), AppError> {
        let mut links = self.links.lock().unwrap();

        if let Some(link) = links.iter_mut().find(|l| l.short_key == short_key) {
            link.click_count = link.click_count.max(count);
        }

        Ok(())
    }

    async fn delete(&self, short_key: &str, owner_id: i64) -> Result<bool, AppError> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| !(l.short_key == short_key && l.owner_id == owner_id));
        Ok(links.len() < before)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// In-memory owner store implementing the repository contract.
#[derive(Default)]
pub struct InMemoryOwnerRepository {
    owners: Mutex<Vec<Owner>>,
    next_id: AtomicI64,
}

impl InMemoryOwnerRepository {
    pub fn new() -> Self {
        Self {
            owners: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl OwnerRepository for InMemoryOwnerRepository {
    async fn create(&self, new_owner: NewOwner) -> Result<Owner, AppError> {
        let mut owners = self.owners.lock().unwrap();

        if owners.iter().any(|o| o.email == new_owner.email) {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": new_owner.email }),
            ));
        }

        let owner = Owner {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: new_owner.email,
            password_hash: new_owner.password_hash,
            created_at: Utc::now(),
        };
        owners.push(owner.clone());

        Ok(owner)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Owner>, AppError> {
        Ok(self
            .owners
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Owner>, AppError> {
        Ok(self
            .owners
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }
}

/// Everything a test needs to drive the service and inspect both stores.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub owners: Arc<InMemoryOwnerRepository>,
    pub cache: Arc<MemoryCache>,
}

/// Builds an [`AppState`] over in-memory repositories and a real
/// [`MemoryCache`], mirroring the production wiring in `server::run`.
pub fn create_test_state(policy: ResolutionPolicy) -> TestContext {
    let links = Arc::new(InMemoryLinkRepository::new());
    let owners = Arc::new(InMemoryOwnerRepository::new());
    let cache = Arc::new(MemoryCache::new(3600));

    let link_service = Arc::new(LinkService::new(links.clone(), cache.clone(), policy));
    let stats_service = Arc::new(StatsService::new(links.clone(), cache.clone()));
    let auth_service = Arc::new(AuthService::new(owners.clone(), TEST_SIGNING_SECRET, 30));

    let state = AppState::new(link_service, stats_service, auth_service, cache.clone());

    TestContext {
        state,
        links,
        owners,
        cache,
    }
}

pub fn default_test_state() -> TestContext {
    create_test_state(ResolutionPolicy::default())
}

/// Registers an owner directly and returns `(owner_id, bearer token)`.
pub async fn register_owner(ctx: &TestContext, email: &str, password: &str) -> (i64, String) {
    let owner = ctx
        .state
        .auth_service
        .register_owner(email, password)
        .await
        .unwrap();
    let token = ctx.state.auth_service.issue_token(owner.id).unwrap();
    (owner.id, token)
}

/// Polls until the durable click count for a key reaches `expected`, failing
/// after a short timeout. Checkpoint writes happen off the request path, so
/// tests wait for them instead of assuming they landed synchronously.
pub async fn wait_for_durable_count(
    links: &InMemoryLinkRepository,
    short_key: &str,
    expected: i64,
) {
    for _ in 0..100 {
        if links.durable_click_count(short_key) == Some(expected) {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!(
        "durable count for {} never reached {} (currently {:?})",
        short_key,
        expected,
        links.durable_click_count(short_key)
    );
}
