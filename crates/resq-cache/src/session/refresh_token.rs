//! Refresh token storage in Redis.
//!
//! Each token lives under its own expiring key; a per-identity set indexes
//! them so that every session of an identity can be revoked at once.

use async_trait::async_trait;
use redis::AsyncCommands;

use resq_core::traits::{RefreshSession, RepoResult, SessionStore};

use crate::pool::{RedisPool, RedisResult};

/// Key prefix for refresh tokens
const REFRESH_TOKEN_PREFIX: &str = "resq:refresh_token:";

/// Key prefix for the per-identity token index
const IDENTITY_TOKENS_PREFIX: &str = "resq:identity_tokens:";

/// Default TTL for refresh tokens (1 day)
const DEFAULT_REFRESH_TOKEN_TTL: u64 = 24 * 60 * 60;

/// Refresh token store for admin sessions
#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self::with_ttl(pool, DEFAULT_REFRESH_TOKEN_TTL)
    }

    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn token_key(token: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token}")
    }

    fn index_key(uid: &str) -> String {
        format!("{IDENTITY_TOKENS_PREFIX}{uid}")
    }

    async fn store_inner(&self, token: &str, session: &RefreshSession) -> RedisResult<()> {
        self.pool
            .set_json(&Self::token_key(token), session, self.ttl_seconds)
            .await?;

        let index = Self::index_key(&session.uid);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&index, token).await?;
        conn.expire::<_, ()>(&index, i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX))
            .await?;

        tracing::debug!(uid = %session.uid, session_id = %session.session_id, "Stored refresh token");
        Ok(())
    }

    async fn revoke_inner(&self, token: &str) -> RedisResult<bool> {
        let key = Self::token_key(token);
        if let Some(session) = self.pool.get_json::<RefreshSession>(&key).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::index_key(&session.uid), token)
                .await?;
        }
        Ok(self.pool.delete(&[key]).await? > 0)
    }

    async fn revoke_all_inner(&self, uid: &str) -> RedisResult<u32> {
        let index = Self::index_key(uid);
        let mut conn = self.pool.get().await?;
        let tokens: Vec<String> = conn.smembers(&index).await?;

        let mut keys: Vec<String> = tokens.iter().map(|t| Self::token_key(t)).collect();
        let count = keys.len() as u32;
        keys.push(index);
        self.pool.delete(&keys).await?;

        tracing::info!(uid = %uid, count, "Revoked all refresh tokens for identity");
        Ok(count)
    }
}

#[async_trait]
impl SessionStore for RefreshTokenStore {
    async fn store(&self, token: &str, session: &RefreshSession) -> RepoResult<()> {
        Ok(self.store_inner(token, session).await?)
    }

    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.pool.get_json(&Self::token_key(token)).await?)
    }

    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        Ok(self.revoke_inner(token).await?)
    }

    async fn revoke_all(&self, uid: &str) -> RepoResult<u32> {
        Ok(self.revoke_all_inner(uid).await?)
    }
}
