use crate::error::{GameError, Result};
use rustc_hash::FxHashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

type Outcome<V> = std::result::Result<V, String>;

struct Entry<V> {
    value: V,
    stored_at: Instant,
    tags: Vec<String>,
}

enum Slot<V> {
    Ready(Entry<V>),
    Pending {
        id: u64,
        tags: Vec<String>,
        rx: watch::Receiver<Option<Outcome<V>>>,
    },
}

impl<V> Slot<V> {
    fn tags(&self) -> &[String] {
        match self {
            Slot::Ready(entry) => &entry.tags,
            Slot::Pending { tags, .. } => tags,
        }
    }
}

struct Inner<V> {
    slots: FxHashMap<String, Slot<V>>,
    next_id: u64,
}

enum Lookup<V> {
    Hit(V),
    Join(watch::Receiver<Option<Outcome<V>>>),
    Miss,
}

/// A value handed out by [`ResultCache::get_or_compute`].
#[derive(Debug, Clone)]
pub struct Cached<V> {
    pub value: V,
    /// `true` when the value came from a computation this call waited on.
    pub computed: bool,
}

/// Process-wide memoization keyed by string, with per-key single-flight.
///
/// At most one computation runs per key at a time; callers that miss while one
/// is in flight wait for it instead of starting their own. The computation is
/// spawned onto the runtime, so it finishes and populates the cache even when
/// every caller waiting on it has gone away.
pub struct ResultCache<V> {
    inner: Arc<Mutex<Inner<V>>>,
    ttl: Option<Duration>,
}

impl<V> Clone for ResultCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ttl: self.ttl,
        }
    }
}

fn lock<V>(inner: &Mutex<Inner<V>>) -> MutexGuard<'_, Inner<V>> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// `ttl` of `None` keeps entries until they are invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                slots: FxHashMap::default(),
                next_id: 0,
            })),
            ttl,
        }
    }

    fn is_expired(&self, entry: &Entry<V>) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }

    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        tags: &[&str],
        compute: F,
    ) -> Result<Cached<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let mut rx = {
            let mut inner = lock(&self.inner);
            let lookup = match inner.slots.get(key) {
                Some(Slot::Ready(entry)) if !self.is_expired(entry) => {
                    Lookup::Hit(entry.value.clone())
                }
                Some(Slot::Pending { rx, .. }) => Lookup::Join(rx.clone()),
                _ => Lookup::Miss,
            };

            match lookup {
                Lookup::Hit(value) => {
                    debug!("Cache hit for {}", key);
                    return Ok(Cached {
                        value,
                        computed: false,
                    });
                }
                Lookup::Join(rx) => {
                    debug!("Joining in-flight computation for {}", key);
                    rx
                }
                Lookup::Miss => {
                    info!("Cache miss for {}, computing", key);
                    let id = inner.next_id;
                    inner.next_id += 1;

                    let (tx, rx) = watch::channel(None);
                    inner.slots.insert(
                        key.to_string(),
                        Slot::Pending {
                            id,
                            tags: tags.iter().map(|t| t.to_string()).collect(),
                            rx: rx.clone(),
                        },
                    );

                    self.spawn_computation(key.to_string(), id, tx, compute());
                    rx
                }
            }
        };

        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(current) => current.clone(),
            Err(_) => None,
        };

        match outcome {
            Some(Ok(value)) => Ok(Cached {
                value,
                computed: true,
            }),
            Some(Err(message)) => Err(GameError::Upstream(message)),
            None => Err(GameError::Upstream(
                "cache computation ended without a result".to_string(),
            )),
        }
    }

    fn spawn_computation<Fut>(
        &self,
        key: String,
        id: u64,
        tx: watch::Sender<Option<Outcome<V>>>,
        computation: Fut,
    ) where
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // A panicking computation must still release the slot and its waiters.
            let outcome = match tokio::spawn(computation).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("cache computation failed: {e}")),
            };

            {
                let mut guard = lock(&inner);
                let still_pending = matches!(
                    guard.slots.get(&key),
                    Some(Slot::Pending { id: pending, .. }) if *pending == id
                );

                if !still_pending {
                    debug!("Result for {} was invalidated while in flight", key);
                } else if let Some(Slot::Pending { tags, .. }) = guard.slots.remove(&key) {
                    match &outcome {
                        Ok(value) => {
                            guard.slots.insert(
                                key.clone(),
                                Slot::Ready(Entry {
                                    value: value.clone(),
                                    stored_at: Instant::now(),
                                    tags,
                                }),
                            );
                        }
                        // Failures are not cached; the next call retries.
                        Err(message) => warn!("Computation for {} failed: {}", key, message),
                    }
                }
            }

            let _ = tx.send(Some(outcome));
        });
    }

    /// Drops the entry for `key`, including one still being computed.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = lock(&self.inner).slots.remove(key).is_some();
        info!("Invalidated cache key {} (present: {})", key, removed);
        removed
    }

    /// Drops every entry carrying `tag`. Returns how many were removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut inner = lock(&self.inner);
        let before = inner.slots.len();
        inner
            .slots
            .retain(|_, slot| !slot.tags().iter().any(|t| t == tag));
        let removed = before - inner.slots.len();
        info!("Invalidated {} cache entries tagged {}", removed, tag);
        removed
    }
}
