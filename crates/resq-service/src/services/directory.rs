//! User directory - shared id -> name cache used to label alert cards
//!
//! Lookups for ids that are not cached (or whose entry went stale) run in
//! parallel, bounded by `lookup_concurrency`. Ids with no profile are cached
//! as the "Unknown User" placeholder; failed reads are logged and left
//! uncached so the next resolve retries them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use resq_common::DirectoryConfig;
use resq_core::traits::UserRepository;
use resq_core::{UserInfo, UserProfile};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
struct CachedEntry {
    info: UserInfo,
    fetched_at: Instant,
}

/// Process-wide user directory cache
pub struct UserDirectory {
    repo: Arc<dyn UserRepository>,
    entries: DashMap<String, CachedEntry>,
    ttl: Duration,
    concurrency: usize,
}

impl UserDirectory {
    pub fn new(repo: Arc<dyn UserRepository>, config: &DirectoryConfig) -> Self {
        Self {
            repo,
            entries: DashMap::new(),
            ttl: Duration::from_secs(config.cache_ttl_secs),
            concurrency: config.lookup_concurrency.max(1),
        }
    }

    /// Fresh cached entry for an id, if any
    pub fn cached(&self, id: &str) -> Option<UserInfo> {
        self.entries
            .get(id)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.info.clone())
    }

    /// Number of entries held, fresh or stale
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a batch of ids.
    ///
    /// Duplicates and empty ids are ignored. Ids whose lookup failed are
    /// missing from the result; callers fall back to "Unknown User".
    #[instrument(skip(self, ids))]
    pub async fn resolve<'a, I>(&self, ids: I) -> HashMap<String, UserInfo>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = ids.into_iter().filter(|id| !id.is_empty()).collect();

        let mut resolved = HashMap::with_capacity(wanted.len());
        let mut misses = Vec::new();
        for id in wanted {
            match self.cached(id) {
                Some(info) => {
                    resolved.insert(id.to_string(), info);
                }
                None => misses.push(id.to_string()),
            }
        }

        if misses.is_empty() {
            return resolved;
        }
        debug!(misses = misses.len(), "Fetching uncached user profiles");

        let lookups: Vec<_> = stream::iter(misses)
            .map(|id| {
                let repo = Arc::clone(&self.repo);
                async move {
                    let result = repo.find_profile(&id).await;
                    (id, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for (id, result) in lookups {
            let info = match result {
                Ok(Some(profile)) => UserInfo::from(&profile),
                Ok(None) => UserInfo::unknown(id.as_str()),
                Err(e) => {
                    warn!(user_id = %id, error = %e, "User lookup failed");
                    continue;
                }
            };
            self.put(info.clone());
            resolved.insert(id, info);
        }

        resolved
    }

    /// Store or replace an entry
    pub fn put(&self, info: UserInfo) {
        self.entries.insert(
            info.id.clone(),
            CachedEntry {
                info,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Refresh an entry from a freshly read profile
    pub fn remember(&self, profile: &UserProfile) {
        self.put(UserInfo::from(profile));
    }

    /// Drop one entry so the next resolve reads it again
    pub fn invalidate(&self, id: &str) {
        self.entries.remove(id);
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}
