//! PostgreSQL implementation of AdminRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use resq_core::entities::AdminRecord;
use resq_core::traits::{AdminRepository, RepoResult};

use crate::models::AdminModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AdminRepository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    #[instrument(skip(self))]
    async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<AdminRecord>> {
        let result = sqlx::query_as::<_, AdminModel>(
            r"
            SELECT uid, is_admin, name FROM admins WHERE uid = $1
            ",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(AdminRecord::from))
    }
}
