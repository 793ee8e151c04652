//! User/bot identifier to display name cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::core::models::UNKNOWN_NAME;
use crate::errors::SlackError;

/// Thread-safe, never-evicting map from user or bot ID to display name.
///
/// Empty names are never stored; they are replaced by `"unknown"` on the way in.
/// Concurrent resolves of the same unseen ID share a single lookup.
#[derive(Debug, Default)]
pub struct IdentityCache {
    names: Mutex<HashMap<String, String>>,
    inflight: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl IdentityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written entry,
        // so the map is still usable after poisoning.
        self.names.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn inflight(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<String>>>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached name for `id`, without any network access.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<String> {
        self.lock().get(id).cloned()
    }

    /// Upsert `name` for `id`; last write wins.
    pub fn set(&self, id: &str, name: &str) -> String {
        let name = if name.is_empty() { UNKNOWN_NAME } else { name };
        self.lock().insert(id.to_string(), name.to_string());
        name.to_string()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Return the cached name for `id`, or run `fetch` and cache what it yields.
    ///
    /// No lock is held while `fetch` runs. Callers racing on the same unseen
    /// ID wait for the first caller's lookup, so `fetch` runs at most once per
    /// ID. A failed lookup caches and returns `"unknown"`; an empty result is
    /// cached as `"unknown"` too.
    pub async fn resolve<F, Fut>(&self, id: &str, fetch: F) -> String
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, SlackError>>,
    {
        if let Some(name) = self.get(id) {
            return name;
        }

        // Lock order is inflight, then names.
        let cell = {
            let mut inflight = self.inflight();
            if let Some(name) = self.get(id) {
                return name;
            }
            Arc::clone(inflight.entry(id.to_string()).or_default())
        };

        let name = cell
            .get_or_init(|| async {
                let fetched = match fetch().await {
                    Ok(name) => name,
                    Err(e) => {
                        let e = SlackError::LookupError(format!("{id}: {e}"));
                        warn!("{}", e);
                        UNKNOWN_NAME.to_string()
                    }
                };

                debug!("Caching identity {} as {:?}", id, fetched);
                self.set(id, &fetched)
            })
            .await
            .clone();

        self.inflight().remove(id);
        name
    }
}
