//! In-memory repositories for service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use resq_common::{hash_password, DirectoryConfig, JwtService};
use resq_core::traits::{
    AdminRepository, AlertChangeFeed, AlertChangeStream, AlertRepository, IdentityRepository,
    RefreshSession, RepoResult, SessionStore, UserRepository,
};
use resq_core::{
    Acknowledgment, AdminRecord, Alert, AlertChange, AlertTimestamp, ChangeOp, DomainError,
    Identity, RawAlert, UserProfile,
};
use tokio::sync::broadcast;

use super::context::{ServiceContext, ServiceContextBuilder};

pub const PASSWORD: &str = "Dispatch#2024";

pub fn alert(id: &str, seconds: i64) -> Alert {
    Alert::from(RawAlert {
        id: id.to_string(),
        sender_id: Some(format!("sender-{id}")),
        content: Some(format!("help needed at {id}")),
        timestamp: Some(AlertTimestamp::new(seconds, 0)),
        ..RawAlert::default()
    })
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Default)]
pub struct MemoryAlerts {
    alerts: Mutex<Vec<Alert>>,
    fail_list: AtomicBool,
    loads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryAlerts {
    pub fn insert(&self, alert: Alert) {
        let mut alerts = self.alerts.lock().unwrap();
        alerts.retain(|a| a.id != alert.id);
        alerts.push(alert);
    }

    pub fn get(&self, id: &str) -> Option<Alert> {
        self.alerts.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }

    pub fn fail_listing(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertRepository for MemoryAlerts {
    async fn list_newest_first(&self) -> RepoResult<Vec<Alert>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("listing failed".to_string()));
        }
        let mut alerts = self.alerts.lock().unwrap().clone();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(alerts)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Alert>> {
        Ok(self.get(id))
    }

    async fn mark_handled(&self, id: &str, ack: &Acknowledgment) -> RepoResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut alerts = self.alerts.lock().unwrap();
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DomainError::AlertNotFound(id.to_string()))?;
        alert.apply_acknowledgment(ack);
        Ok(())
    }
}

// ============================================================================
// Change feed
// ============================================================================

pub struct MemoryChangeFeed {
    tx: broadcast::Sender<Option<AlertChange>>,
    fail_subscribe: AtomicBool,
}

impl Default for MemoryChangeFeed {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            tx,
            fail_subscribe: AtomicBool::new(false),
        }
    }
}

impl MemoryChangeFeed {
    pub fn notify(&self, id: &str) {
        let _ = self.tx.send(Some(AlertChange {
            collection: "dashboard_alerts".to_string(),
            id: id.to_string(),
            op: ChangeOp::Update,
        }));
    }

    /// Drop every open subscription
    pub fn disconnect(&self) {
        let _ = self.tx.send(None);
    }

    pub fn fail_subscribing(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }
}

struct MemoryChangeStream {
    rx: broadcast::Receiver<Option<AlertChange>>,
}

#[async_trait]
impl AlertChangeFeed for MemoryChangeFeed {
    async fn subscribe(&self) -> RepoResult<Box<dyn AlertChangeStream>> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("listen failed".to_string()));
        }
        Ok(Box::new(MemoryChangeStream {
            rx: self.tx.subscribe(),
        }))
    }
}

#[async_trait]
impl AlertChangeStream for MemoryChangeStream {
    async fn next_change(&mut self) -> RepoResult<AlertChange> {
        loop {
            match self.rx.recv().await {
                Ok(Some(change)) => return Ok(change),
                Ok(None) | Err(broadcast::error::RecvError::Closed) => {
                    return Err(DomainError::FeedDisconnected)
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
            }
        }
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct MemoryUsers {
    profiles: Mutex<HashMap<String, UserProfile>>,
    failing: Mutex<Vec<String>>,
    lookups: Mutex<HashMap<String, usize>>,
}

impl MemoryUsers {
    pub fn add(&self, id: &str, name: &str) {
        let mut profile = UserProfile::new(id, Some(name.to_string()));
        profile.email = Some(format!("{id}@example.com"));
        self.add_profile(profile);
    }

    pub fn add_profile(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
    }

    pub fn fail_on(&self, id: &str) {
        self.failing.lock().unwrap().push(id.to_string());
    }

    pub fn lookups(&self, id: &str) -> usize {
        self.lookups.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub fn total_lookups(&self) -> usize {
        self.lookups.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_profile(&self, id: &str) -> RepoResult<Option<UserProfile>> {
        *self.lookups.lock().unwrap().entry(id.to_string()).or_default() += 1;
        if self.failing.lock().unwrap().iter().any(|f| f == id) {
            return Err(DomainError::DatabaseError("profile read failed".to_string()));
        }
        Ok(self.profiles.lock().unwrap().get(id).cloned())
    }
}

// ============================================================================
// Identities and admins
// ============================================================================

#[derive(Default)]
pub struct MemoryIdentities {
    identities: Mutex<HashMap<String, (Identity, String)>>,
    logins: AtomicUsize,
}

impl MemoryIdentities {
    pub fn add(&self, uid: &str, email: &str, display_name: Option<&str>) {
        let identity = Identity {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
        };
        let hash = hash_password(PASSWORD).unwrap();
        self.identities
            .lock()
            .unwrap()
            .insert(uid.to_string(), (identity, hash));
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentities {
    async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<Identity>> {
        Ok(self.identities.lock().unwrap().get(uid).map(|(i, _)| i.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .values()
            .find(|(i, _)| i.email.eq_ignore_ascii_case(email))
            .map(|(i, _)| i.clone()))
    }

    async fn get_password_hash(&self, uid: &str) -> RepoResult<Option<String>> {
        Ok(self.identities.lock().unwrap().get(uid).map(|(_, h)| h.clone()))
    }

    async fn touch_last_login(&self, _uid: &str) -> RepoResult<()> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAdmins {
    records: Mutex<HashMap<String, AdminRecord>>,
}

impl MemoryAdmins {
    pub fn set(&self, uid: &str, is_admin: bool, name: Option<&str>) {
        self.records.lock().unwrap().insert(
            uid.to_string(),
            AdminRecord {
                uid: uid.to_string(),
                is_admin,
                name: name.map(str::to_string),
            },
        );
    }
}

#[async_trait]
impl AdminRepository for MemoryAdmins {
    async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<AdminRecord>> {
        Ok(self.records.lock().unwrap().get(uid).cloned())
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Default)]
pub struct MemorySessions {
    sessions: Mutex<HashMap<String, RefreshSession>>,
}

impl MemorySessions {
    pub fn count_for(&self, uid: &str) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.uid == uid)
            .count()
    }
}

#[async_trait]
impl SessionStore for MemorySessions {
    async fn store(&self, token: &str, session: &RefreshSession) -> RepoResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(token.to_string(), session.clone());
        Ok(())
    }

    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.sessions.lock().unwrap().get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        Ok(self.sessions.lock().unwrap().remove(token).is_some())
    }

    async fn revoke_all(&self, uid: &str) -> RepoResult<u32> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.uid != uid);
        Ok(u32::try_from(before - sessions.len()).unwrap())
    }
}

// ============================================================================
// Context
// ============================================================================

/// A service context wired to in-memory repositories
pub struct TestWorld {
    pub alerts: Arc<MemoryAlerts>,
    pub feed: Arc<MemoryChangeFeed>,
    pub users: Arc<MemoryUsers>,
    pub identities: Arc<MemoryIdentities>,
    pub admins: Arc<MemoryAdmins>,
    pub sessions: Arc<MemorySessions>,
    pub ctx: ServiceContext,
}

impl TestWorld {
    pub fn new() -> Self {
        let alerts = Arc::new(MemoryAlerts::default());
        let feed = Arc::new(MemoryChangeFeed::default());
        let users = Arc::new(MemoryUsers::default());
        let identities = Arc::new(MemoryIdentities::default());
        let admins = Arc::new(MemoryAdmins::default());
        let sessions = Arc::new(MemorySessions::default());

        let ctx = ServiceContextBuilder::new()
            .alert_repo(alerts.clone())
            .change_feed(feed.clone())
            .user_repo(users.clone())
            .identity_repo(identities.clone())
            .admin_repo(admins.clone())
            .session_store(sessions.clone())
            .jwt_service(Arc::new(JwtService::new("test-secret", 900, 86_400)))
            .directory_config(DirectoryConfig::default())
            .build()
            .unwrap();

        Self {
            alerts,
            feed,
            users,
            identities,
            admins,
            sessions,
            ctx,
        }
    }

    /// Register an identity that is an admin
    pub fn with_admin(self, uid: &str, email: &str) -> Self {
        self.identities.add(uid, email, None);
        self.admins.set(uid, true, None);
        self
    }
}
