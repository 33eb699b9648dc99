//! Refresh-token session storage (port)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repositories::RepoResult;

/// What is remembered about an issued refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    /// Identity uid the token belongs to
    pub uid: String,
    pub session_id: String,
    /// Unix epoch seconds
    pub created_at: i64,
}

impl RefreshSession {
    pub fn new(uid: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            session_id: session_id.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Remember a refresh token
    async fn store(&self, token: &str, session: &RefreshSession) -> RepoResult<()>;

    /// Look up a refresh token; `None` if revoked or expired
    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshSession>>;

    /// Forget one refresh token
    async fn revoke(&self, token: &str) -> RepoResult<bool>;

    /// Forget every refresh token of an identity (sign-out everywhere)
    async fn revoke_all(&self, uid: &str) -> RepoResult<u32>;
}
