//! `PgListener`-backed implementation of the alert change feed
//!
//! The alert tables carry a trigger that publishes a JSON payload on
//! [`ALERT_CHANGE_CHANNEL`] for every row change. Each subscription owns a
//! dedicated listener connection; dropping the stream closes it.

use async_trait::async_trait;
use resq_common::AlertCollection;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use resq_core::error::DomainError;
use resq_core::events::AlertChange;
use resq_core::traits::{AlertChangeFeed, AlertChangeStream, RepoResult};

use crate::repositories::map_db_error;

/// Notification channel used by the alert table triggers
pub const ALERT_CHANGE_CHANNEL: &str = "resq_alert_changes";

/// Opens change subscriptions for one alert collection
#[derive(Clone)]
pub struct PgAlertChangeFeed {
    pool: PgPool,
    collection: AlertCollection,
}

impl PgAlertChangeFeed {
    pub fn new(pool: PgPool, collection: AlertCollection) -> Self {
        Self { pool, collection }
    }
}

#[async_trait]
impl AlertChangeFeed for PgAlertChangeFeed {
    #[instrument(skip(self), fields(table = self.collection.table_name()))]
    async fn subscribe(&self) -> RepoResult<Box<dyn AlertChangeStream>> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(map_db_error)?;
        listener
            .listen(ALERT_CHANGE_CHANNEL)
            .await
            .map_err(map_db_error)?;

        debug!("Alert change subscription opened");
        Ok(Box::new(PgAlertChangeStream {
            listener,
            table: self.collection.table_name(),
        }))
    }
}

struct PgAlertChangeStream {
    listener: PgListener,
    table: &'static str,
}

#[async_trait]
impl AlertChangeStream for PgAlertChangeStream {
    async fn next_change(&mut self) -> RepoResult<AlertChange> {
        loop {
            // try_recv reports a lost connection as Ok(None) instead of
            // silently reconnecting; notifications sent meanwhile are gone.
            let notification = match self.listener.try_recv().await {
                Ok(Some(n)) => n,
                Ok(None) => return Err(DomainError::FeedDisconnected),
                Err(e) => return Err(map_db_error(e)),
            };

            match AlertChange::from_payload(notification.payload()) {
                Ok(change) if change.collection == self.table => return Ok(change),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, payload = notification.payload(), "Ignoring malformed alert change");
                }
            }
        }
    }
}
