//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Acknowledgment, AdminRecord, Alert, Identity, UserProfile};
use crate::error::DomainError;
use crate::events::AlertChange;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Alert Repository
// ============================================================================

#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Every alert in the active collection, newest first, normalized
    async fn list_newest_first(&self) -> RepoResult<Vec<Alert>>;

    /// Find a single alert
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Alert>>;

    /// Write the acknowledgment fields.
    ///
    /// A single unconditional update; the last writer wins.
    async fn mark_handled(&self, id: &str, ack: &Acknowledgment) -> RepoResult<()>;
}

// ============================================================================
// Alert change feed
// ============================================================================

/// Source of change notifications for the active alert collection
#[async_trait]
pub trait AlertChangeFeed: Send + Sync {
    /// Open a new subscription. Each live view owns its own.
    async fn subscribe(&self) -> RepoResult<Box<dyn AlertChangeStream>>;
}

/// An open subscription
#[async_trait]
pub trait AlertChangeStream: Send {
    /// Wait for the next change.
    ///
    /// Returns [`DomainError::FeedDisconnected`] once the underlying
    /// connection is gone; the stream is unusable afterwards.
    async fn next_change(&mut self) -> RepoResult<AlertChange>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Read one full profile
    async fn find_profile(&self, id: &str) -> RepoResult<Option<UserProfile>>;
}

// ============================================================================
// Identity Repository
// ============================================================================

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find identity by uid
    async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<Identity>>;

    /// Find identity by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, uid: &str) -> RepoResult<Option<String>>;

    /// Record a successful sign-in
    async fn touch_last_login(&self, uid: &str) -> RepoResult<()>;
}

// ============================================================================
// Admin Repository
// ============================================================================

#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Look up the admins entry for a uid
    async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<AdminRecord>>;
}
