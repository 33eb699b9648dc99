//! PostgreSQL implementation of AlertRepository

use async_trait::async_trait;
use resq_common::AlertCollection;
use sqlx::PgPool;
use tracing::{debug, instrument};

use resq_core::entities::{Acknowledgment, Alert};
use resq_core::traits::{AlertRepository, RepoResult};

use crate::mappers::timestamp_parts;
use crate::models::{AlertModel, ALERT_COLUMNS};

use super::error::{alert_not_found, map_db_error};

/// PostgreSQL implementation of AlertRepository.
///
/// Bound to one alert table for its whole lifetime.
#[derive(Clone)]
pub struct PgAlertRepository {
    pool: PgPool,
    collection: AlertCollection,
    list_sql: String,
    find_sql: String,
    handle_sql: String,
}

impl PgAlertRepository {
    pub fn new(pool: PgPool, collection: AlertCollection) -> Self {
        let table = collection.table_name();
        Self {
            pool,
            collection,
            list_sql: format!(
                "SELECT {ALERT_COLUMNS} FROM {table} \
                 ORDER BY ts_seconds DESC NULLS LAST, ts_nanos DESC NULLS LAST, id"
            ),
            find_sql: format!("SELECT {ALERT_COLUMNS} FROM {table} WHERE id = $1"),
            handle_sql: format!(
                "UPDATE {table} \
                 SET status = 'handled', is_handled = TRUE, handled_by = $2, \
                     handled_at_seconds = $3, handled_at_nanos = $4 \
                 WHERE id = $1"
            ),
        }
    }

    pub fn collection(&self) -> AlertCollection {
        self.collection
    }
}

#[async_trait]
impl AlertRepository for PgAlertRepository {
    #[instrument(skip(self), fields(table = self.collection.table_name()))]
    async fn list_newest_first(&self) -> RepoResult<Vec<Alert>> {
        let rows = sqlx::query_as::<_, AlertModel>(&self.list_sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        debug!(count = rows.len(), "Loaded alerts");
        Ok(rows.into_iter().map(Alert::from).collect())
    }

    #[instrument(skip(self), fields(table = self.collection.table_name()))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Alert>> {
        let row = sqlx::query_as::<_, AlertModel>(&self.find_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(Alert::from))
    }

    #[instrument(skip(self, ack), fields(table = self.collection.table_name()))]
    async fn mark_handled(&self, id: &str, ack: &Acknowledgment) -> RepoResult<()> {
        let (seconds, nanos) = timestamp_parts(ack.handled_at);

        let result = sqlx::query(&self.handle_sql)
            .bind(id)
            .bind(&ack.handled_by)
            .bind(seconds)
            .bind(nanos)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(alert_not_found(id));
        }

        Ok(())
    }
}
