// ── Response cache ──
//
// Raw list responses keyed by logical endpoint. Entries never expire; they
// are replaced by a successful reload or dropped by an explicit
// invalidation after a mutation.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use infradeck_api::Backend;
use serde_json::Value;
use tracing::trace;

/// Logical endpoint identity: backend, collection path, and query.
///
/// Displays as `vyos:/firewall/policies` or
/// `kubernetes:/pods?namespace=prod`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    backend: Backend,
    segments: Vec<String>,
    params: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(backend: Backend, segments: &[&str]) -> Self {
        Self {
            backend,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            params: Vec::new(),
        }
    }

    /// Add a query parameter. Parameters are part of the identity, so
    /// `/pods?namespace=a` and `/pods?namespace=b` are cached separately.
    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_owned(), value.into()));
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }

    pub fn params(&self) -> Vec<(&str, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:/{}", self.backend, self.segments.join("/"))?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

/// Process-wide store of list responses.
///
/// `get` returning `None` means "never cached (or invalidated)", which is
/// distinct from a cached empty array. All operations are synchronous.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, Arc<Value>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Value>> {
        self.entries.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Insert or overwrite.
    pub fn set(&self, key: CacheKey, value: Arc<Value>) {
        trace!(%key, "cache set");
        self.entries.insert(key, value);
    }

    /// Remove one key. A no-op for absent keys.
    pub fn invalidate(&self, key: &CacheKey) {
        if self.entries.remove(key).is_some() {
            trace!(%key, "cache invalidated");
        }
    }

    /// Drop every entry belonging to one backend.
    pub fn invalidate_prefix(&self, backend: Backend) {
        self.entries.retain(|key, _| key.backend != backend);
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
