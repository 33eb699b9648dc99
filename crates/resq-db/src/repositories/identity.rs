//! PostgreSQL implementation of IdentityRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use resq_core::entities::Identity;
use resq_core::traits::{IdentityRepository, RepoResult};

use crate::models::IdentityModel;

use super::error::map_db_error;

/// PostgreSQL implementation of IdentityRepository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    #[instrument(skip(self))]
    async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<Identity>> {
        let result = sqlx::query_as::<_, IdentityModel>(
            r"
            SELECT uid, email, display_name, password_hash, created_at, last_login_at
            FROM identities
            WHERE uid = $1
            ",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Identity::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>> {
        let result = sqlx::query_as::<_, IdentityModel>(
            r"
            SELECT uid, email, display_name, password_hash, created_at, last_login_at
            FROM identities
            WHERE LOWER(email) = LOWER($1)
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Identity::from))
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, uid: &str) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM identities WHERE uid = $1
            ",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn touch_last_login(&self, uid: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE identities SET last_login_at = NOW() WHERE uid = $1
            ",
        )
        .bind(uid)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
