//! Service context - dependency container for services
//!
//! Holds the repositories, the session store, the user directory and the JWT
//! service needed by the dashboard services.

use std::sync::Arc;

use resq_cache::RedisPool;
use resq_common::{DirectoryConfig, JwtService, PasswordService};
use resq_core::traits::{
    AdminRepository, AlertChangeFeed, AlertRepository, IdentityRepository, SessionStore,
    UserRepository,
};
use resq_db::PgPool;

use super::directory::UserDirectory;
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// The database and Redis pools are optional so the services can run against
/// in-memory repositories; readiness reports them unhealthy when absent.
#[derive(Clone)]
pub struct ServiceContext {
    // Connection pools (readiness probes only)
    pool: Option<PgPool>,
    redis_pool: Option<RedisPool>,

    // Repositories
    alert_repo: Arc<dyn AlertRepository>,
    change_feed: Arc<dyn AlertChangeFeed>,
    user_repo: Arc<dyn UserRepository>,
    identity_repo: Arc<dyn IdentityRepository>,
    admin_repo: Arc<dyn AdminRepository>,

    // Sessions
    session_store: Arc<dyn SessionStore>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    directory: Arc<UserDirectory>,
}

impl ServiceContext {
    // === Connection Pools ===

    /// Get the PostgreSQL connection pool, if configured
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Get the Redis connection pool, if configured
    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }

    /// Whether the database answers a ping
    pub async fn database_healthy(&self) -> bool {
        match &self.pool {
            Some(pool) => resq_db::ping(pool).await,
            None => false,
        }
    }

    /// Whether Redis answers a ping
    pub async fn cache_healthy(&self) -> bool {
        match &self.redis_pool {
            Some(pool) => pool.health_check().await.is_ok(),
            None => false,
        }
    }

    // === Repositories ===

    pub fn alert_repo(&self) -> &dyn AlertRepository {
        self.alert_repo.as_ref()
    }

    /// Shared handle to the alert repository, for long-lived feed tasks
    pub fn alert_repo_arc(&self) -> Arc<dyn AlertRepository> {
        Arc::clone(&self.alert_repo)
    }

    pub fn change_feed(&self) -> Arc<dyn AlertChangeFeed> {
        Arc::clone(&self.change_feed)
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn identity_repo(&self) -> &dyn IdentityRepository {
        self.identity_repo.as_ref()
    }

    pub fn admin_repo(&self) -> &dyn AdminRepository {
        self.admin_repo.as_ref()
    }

    // === Sessions ===

    /// Get the refresh token session store
    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Get the shared user directory cache
    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.is_some())
            .field("redis_pool", &self.redis_pool.is_some())
            .field("repositories", &"...")
            .field("directory_entries", &self.directory.len())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<RedisPool>,
    alert_repo: Option<Arc<dyn AlertRepository>>,
    change_feed: Option<Arc<dyn AlertChangeFeed>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    identity_repo: Option<Arc<dyn IdentityRepository>>,
    admin_repo: Option<Arc<dyn AdminRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    jwt_service: Option<Arc<JwtService>>,
    directory_config: DirectoryConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: RedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn alert_repo(mut self, repo: Arc<dyn AlertRepository>) -> Self {
        self.alert_repo = Some(repo);
        self
    }

    pub fn change_feed(mut self, feed: Arc<dyn AlertChangeFeed>) -> Self {
        self.change_feed = Some(feed);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn identity_repo(mut self, repo: Arc<dyn IdentityRepository>) -> Self {
        self.identity_repo = Some(repo);
        self
    }

    pub fn admin_repo(mut self, repo: Arc<dyn AdminRepository>) -> Self {
        self.admin_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn directory_config(mut self, config: DirectoryConfig) -> Self {
        self.directory_config = config;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        let user_repo = required(self.user_repo, "user_repo")?;
        let directory = Arc::new(UserDirectory::new(
            Arc::clone(&user_repo),
            &self.directory_config,
        ));

        Ok(ServiceContext {
            pool: self.pool,
            redis_pool: self.redis_pool,
            alert_repo: required(self.alert_repo, "alert_repo")?,
            change_feed: required(self.change_feed, "change_feed")?,
            user_repo,
            identity_repo: required(self.identity_repo, "identity_repo")?,
            admin_repo: required(self.admin_repo, "admin_repo")?,
            session_store: required(self.session_store, "session_store")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: PasswordService::new(),
            directory,
        })
    }
}
