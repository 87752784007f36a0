// ── Action-state tracking ──
//
// One in-flight mutation per resource identity. A tab begins an action on
// its key, gets back a guard, and the key stays busy until the guard drops:
// on success, on error, on panic, or when the caller's future is dropped
// mid-await. Busy keys are published on a `watch` channel so a UI can
// re-render disabled affordances without polling.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;

/// Identity of one mutating action, e.g. `"start-abc123"` or
/// `"prod/api-7d9f"`.
///
/// Keys are only unique within one tracker; each tab owns its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionKey(String);

impl ActionKey {
    /// `"<action>-<id>"`
    pub fn new(action: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self(format!("{action}-{id}"))
    }

    /// `"<scope>/<name>"`, for resources addressed by a parent and a name
    /// (namespace and pod, policy and rule).
    pub fn scoped(scope: impl fmt::Display, name: impl fmt::Display) -> Self {
        Self(format!("{scope}/{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

struct Inner {
    busy: DashMap<ActionKey, Instant>,
    snapshot: watch::Sender<Arc<BTreeSet<ActionKey>>>,
}

impl Inner {
    /// Rebuild the busy-set snapshot. Runs under the channel's write lock
    /// so concurrent publishers cannot leave a stale set behind.
    fn publish(&self) {
        self.snapshot.send_modify(|snapshot| {
            *snapshot = Arc::new(self.busy.iter().map(|e| e.key().clone()).collect());
        });
    }
}

/// Tracks which action keys currently have a mutation in flight.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ActionTracker {
    inner: Arc<Inner>,
}

impl Default for ActionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTracker")
            .field("busy", &self.busy_keys())
            .finish()
    }
}

impl ActionTracker {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(BTreeSet::new()));
        Self {
            inner: Arc::new(Inner {
                busy: DashMap::new(),
                snapshot,
            }),
        }
    }

    /// Mark `key` busy. Fails with [`CoreError::Busy`] when an action with
    /// the same key is already running; no network call should be made in
    /// that case.
    pub fn begin(&self, key: ActionKey) -> Result<ActionGuard, CoreError> {
        // The entry holds a shard lock; release it before publishing.
        let claimed = match self.inner.busy.entry(key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                true
            }
        };

        if !claimed {
            debug!(%key, "action rejected, key busy");
            return Err(CoreError::Busy { key });
        }

        self.inner.publish();
        Ok(ActionGuard {
            inner: Arc::clone(&self.inner),
            key,
        })
    }

    /// Run `fut` while holding `key`. The key is released whatever the
    /// outcome, and `fut` is never polled if the key was already busy.
    pub async fn run<T, E, F>(&self, key: ActionKey, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, E>>,
        CoreError: From<E>,
    {
        let _guard = self.begin(key)?;
        fut.await.map_err(CoreError::from)
    }

    pub fn is_busy(&self, key: &ActionKey) -> bool {
        self.inner.busy.contains_key(key)
    }

    /// Snapshot of every busy key.
    pub fn busy_keys(&self) -> Arc<BTreeSet<ActionKey>> {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver that changes whenever a key becomes busy or is released.
    pub fn subscribe(&self) -> watch::Receiver<Arc<BTreeSet<ActionKey>>> {
        self.inner.snapshot.subscribe()
    }
}

/// Holds an action key busy; releases it on drop.
#[must_use = "the action key is released as soon as the guard is dropped"]
pub struct ActionGuard {
    inner: Arc<Inner>,
    key: ActionKey,
}

impl ActionGuard {
    pub fn key(&self) -> &ActionKey {
        &self.key
    }
}

impl fmt::Debug for ActionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionGuard").field(&self.key).finish()
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        if let Some((key, started)) = self.inner.busy.remove(&self.key) {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            debug!(%key, elapsed_ms, "action released");
            self.inner.publish();
        }
    }
}
