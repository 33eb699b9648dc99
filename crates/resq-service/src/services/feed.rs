//! Alert feed - live, name-resolved view of the active alert collection
//!
//! Each subscriber gets its own background task. The task opens a change
//! subscription before the first load, so nothing written during the load is
//! missed, then publishes a fresh snapshot after every change. Bursts of
//! changes that arrive while a snapshot is being built collapse into a single
//! reload. A lost subscription or failed load is terminal: the state moves to
//! [`FeedState::Failed`] and the task ends.
//!
//! Dropping the [`AlertFeedHandle`] cancels the task and its subscription.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use resq_core::traits::{AlertChangeFeed, AlertChangeStream, AlertRepository};
use resq_core::{Alert, DomainError, RepoResult, UserInfo};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::dto::mappers::party_ids;

use super::context::ServiceContext;
use super::directory::UserDirectory;

/// One published state of the alert collection
#[derive(Debug)]
pub struct FeedSnapshot {
    /// Increments with every publish, starting at 1
    pub version: u64,
    /// Newest first
    pub alerts: Vec<Alert>,
    /// Resolved names for every sender and receiver id, where known
    pub users: HashMap<String, UserInfo>,
    pub loaded_at: DateTime<Utc>,
}

/// Why a feed stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFailure {
    pub message: String,
    /// The change subscription dropped, as opposed to a failed load
    pub connection_lost: bool,
}

impl FeedFailure {
    fn from_error(err: &DomainError) -> Self {
        match err {
            DomainError::FeedDisconnected => Self {
                message: "Connection error".to_string(),
                connection_lost: true,
            },
            _ => Self {
                message: "Failed to load alerts".to_string(),
                connection_lost: false,
            },
        }
    }
}

/// Observable feed state
#[derive(Debug, Clone)]
pub enum FeedState {
    Loading,
    Ready(Arc<FeedSnapshot>),
    Failed(FeedFailure),
}

impl FeedState {
    pub fn snapshot(&self) -> Option<&Arc<FeedSnapshot>> {
        match self {
            Self::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Spawns live alert feeds
pub struct AlertFeed {
    alerts: Arc<dyn AlertRepository>,
    changes: Arc<dyn AlertChangeFeed>,
    directory: Arc<UserDirectory>,
}

impl AlertFeed {
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        changes: Arc<dyn AlertChangeFeed>,
        directory: Arc<UserDirectory>,
    ) -> Self {
        Self {
            alerts,
            changes,
            directory,
        }
    }

    /// Feed wired to the context's repositories and shared directory
    pub fn from_context(ctx: &ServiceContext) -> Self {
        Self::new(
            ctx.alert_repo_arc(),
            ctx.change_feed(),
            Arc::clone(ctx.directory()),
        )
    }

    /// Start a subscriber task
    pub fn spawn(self) -> AlertFeedHandle {
        let (tx, rx) = watch::channel(FeedState::Loading);
        let task = tokio::spawn(async move {
            if let Err(e) = self.run(&tx).await {
                warn!(error = %e, "Alert feed stopped");
                let _ = tx.send(FeedState::Failed(FeedFailure::from_error(&e)));
            }
        });

        AlertFeedHandle { state: rx, task }
    }

    async fn run(&self, tx: &watch::Sender<FeedState>) -> RepoResult<()> {
        let mut stream = self.changes.subscribe().await?;
        let mut version = 0;

        loop {
            version += 1;
            let snapshot = self.load(version).await?;
            debug!(version, alerts = snapshot.alerts.len(), "Publishing alert snapshot");
            if tx.send(FeedState::Ready(Arc::new(snapshot))).is_err() {
                return Ok(());
            }

            tokio::select! {
                change = stream.next_change() => {
                    let change = change?;
                    debug!(alert_id = %change.id, op = ?change.op, "Alert changed");
                }
                () = tx.closed() => {
                    info!("Alert feed has no subscribers; stopping");
                    return Ok(());
                }
            }

            drain_pending(&mut *stream)?;
        }
    }

    #[instrument(skip(self))]
    async fn load(&self, version: u64) -> RepoResult<FeedSnapshot> {
        let alerts = self.alerts.list_newest_first().await?;
        let users = self.directory.resolve(party_ids(&alerts)).await;
        Ok(FeedSnapshot {
            version,
            alerts,
            users,
            loaded_at: Utc::now(),
        })
    }
}

/// Consume every change that is already waiting
fn drain_pending(stream: &mut dyn AlertChangeStream) -> RepoResult<()> {
    let mut skipped = 0_usize;
    while let Some(change) = stream.next_change().now_or_never() {
        change?;
        skipped += 1;
    }
    if skipped > 0 {
        debug!(skipped, "Coalesced queued alert changes");
    }
    Ok(())
}

/// A running feed. Dropping it stops the task.
pub struct AlertFeedHandle {
    state: watch::Receiver<FeedState>,
    task: JoinHandle<()>,
}

impl AlertFeedHandle {
    /// Latest state
    pub fn current(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Wait for the next state. `None` once the feed task has ended and
    /// its final state was already seen.
    pub async fn changed(&mut self) -> Option<FeedState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }
}

impl Drop for AlertFeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
