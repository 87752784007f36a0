// ── Resource tabs ──
//
// One service per resource view. Every tab pairs the console's shared
// `CachedLoader` with an `ActionTracker` of its own: reads go through the
// loader, mutations are gated on an `ActionKey` and invalidate the affected
// collection on success.

mod cloud;
mod containers;
mod firewall;
mod interfaces;
mod kubernetes;
mod nat;
mod vms;

pub use cloud::CloudTab;
pub use containers::ContainersTab;
pub use firewall::{FirewallTab, group_key, policy_key, rule_key};
pub use interfaces::{InterfacesTab, vlan_key, vrf_key};
pub use kubernetes::{DeploymentsTab, PodsTab, workload_key};
pub use nat::{NatTab, nat_rule_key};
pub use vms::VmsTab;

use std::future::Future;
use std::sync::Arc;

use infradeck_api::{Backend, Gateway};
use serde_json::Value;

use crate::action::{ActionKey, ActionTracker};
use crate::error::CoreError;
use crate::store::{CacheKey, CachedLoader};

/// Loader and tracker shared by the methods of one tab.
#[derive(Debug, Clone)]
pub(crate) struct TabContext {
    loader: CachedLoader,
    actions: ActionTracker,
    backend: Backend,
}

impl TabContext {
    /// Fails with `BackendNotConfigured` when `backend` has no gateway.
    pub(crate) fn new(loader: CachedLoader, backend: Backend) -> Result<Self, CoreError> {
        loader.gateways().get(backend)?;
        Ok(Self {
            loader,
            actions: ActionTracker::new(),
            backend,
        })
    }

    /// The backend's current gateway, looked up on every call like
    /// `CachedLoader::load` does.
    pub(crate) fn gateway(&self) -> Result<Gateway, CoreError> {
        self.loader.gateways().get(self.backend)
    }

    pub(crate) fn actions(&self) -> &ActionTracker {
        &self.actions
    }

    pub(crate) fn invalidate(&self, key: &CacheKey) {
        self.loader.invalidate(key);
    }

    pub(crate) async fn load(&self, key: &CacheKey, force: bool) -> Result<Arc<Value>, CoreError> {
        self.loader.load(key, force).await
    }

    /// Run a mutation under `key`, then drop the `stale` cache entries if it
    /// succeeded. A busy key fails fast and `fut` is never polled.
    pub(crate) async fn mutate<T, E, F>(
        &self,
        key: ActionKey,
        stale: &[CacheKey],
        fut: F,
    ) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, E>>,
        CoreError: From<E>,
    {
        let out = self.actions.run(key, fut).await?;
        for stale_key in stale {
            self.loader.invalidate(stale_key);
        }
        Ok(out)
    }
}
