// ── Cached list loader ──
//
// The only path by which list data enters the response cache.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use super::cache::{CacheKey, ResponseCache};
use crate::backends::Gateways;
use crate::error::CoreError;

/// Cache-or-fetch for list endpoints, shared by every tab of a console.
///
/// Cheap to clone; clones share the cache and the gateways.
#[derive(Debug, Clone)]
pub struct CachedLoader {
    cache: Arc<ResponseCache>,
    gateways: Arc<Gateways>,
}

impl CachedLoader {
    pub fn new(cache: Arc<ResponseCache>, gateways: Arc<Gateways>) -> Self {
        Self { cache, gateways }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn gateways(&self) -> &Arc<Gateways> {
        &self.gateways
    }

    /// Return the cached response for `key`, fetching it on a miss.
    ///
    /// With `force_refresh` the entry is dropped before the fetch, so a
    /// failed refresh leaves the key empty rather than stale. A failed fetch
    /// never populates the cache. Concurrent misses on one key each fetch;
    /// whichever response lands last owns the slot.
    pub async fn load(&self, key: &CacheKey, force_refresh: bool) -> Result<Arc<Value>, CoreError> {
        if force_refresh {
            self.cache.invalidate(key);
        } else if let Some(hit) = self.cache.get(key) {
            trace!(%key, "cache hit");
            return Ok(hit);
        }

        debug!(%key, force_refresh, "cache miss, fetching");
        let gateway = self.gateways.get(key.backend())?;
        let value: Value = gateway
            .get_with_params(&key.segments(), &key.params())
            .await?;

        let value = Arc::new(value);
        self.cache.set(key.clone(), Arc::clone(&value));
        Ok(value)
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key);
    }
}
