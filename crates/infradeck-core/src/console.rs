// ── Console facade ──
//
// Owns the response cache and the backend gateways for one session. Tabs
// are vended from here and share both; each tab gets its own action
// tracker.

use std::sync::Arc;

use infradeck_api::{Backend, Gateway};
use tracing::{debug, info};

use crate::backends::Gateways;
use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::store::{CachedLoader, ResponseCache};
use crate::tabs::{
    CloudTab, ContainersTab, DeploymentsTab, FirewallTab, InterfacesTab, NatTab, PodsTab, VmsTab,
};

/// Session root. The cache lives exactly as long as the console (or its
/// last tab) does; [`reset`](Self::reset) clears it at session end.
#[derive(Debug, Clone)]
pub struct Console {
    loader: CachedLoader,
}

impl Console {
    /// Build gateways for every configured backend. No request is made.
    pub fn new(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let gateways = Gateways::from_config(config)?;
        info!(backends = config.backends.len(), "console initialized");
        Ok(Self::with_gateways(gateways))
    }

    /// Use prebuilt gateways (custom HTTP clients, tests).
    pub fn with_gateways(gateways: Gateways) -> Self {
        let loader = CachedLoader::new(Arc::new(ResponseCache::new()), Arc::new(gateways));
        Self { loader }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        self.loader.cache()
    }

    pub fn loader(&self) -> &CachedLoader {
        &self.loader
    }

    pub fn is_configured(&self, backend: Backend) -> bool {
        self.loader.gateways().is_configured(backend)
    }

    /// Point `backend` at a new gateway and drop everything cached from
    /// the old one. Existing tabs read from and write to the new gateway.
    pub fn configure_backend(&self, backend: Backend, gateway: Gateway) {
        debug!(%backend, url = %gateway.base_url(), "reconfiguring backend");
        self.loader.gateways().insert(backend, gateway);
        self.loader.cache().invalidate_prefix(backend);
    }

    /// Clear the whole response cache.
    pub fn reset(&self) {
        debug!(entries = self.loader.cache().len(), "clearing response cache");
        self.loader.cache().invalidate_all();
    }

    // ── Tabs ─────────────────────────────────────────────────────────
    //
    // Each call returns a fresh tab with an empty tracker, or
    // `BackendNotConfigured` when its backend has no URL.

    pub fn firewall(&self) -> Result<FirewallTab, CoreError> {
        FirewallTab::new(self.loader.clone())
    }

    pub fn nat(&self) -> Result<NatTab, CoreError> {
        NatTab::new(self.loader.clone())
    }

    pub fn interfaces(&self) -> Result<InterfacesTab, CoreError> {
        InterfacesTab::new(self.loader.clone())
    }

    pub fn containers(&self) -> Result<ContainersTab, CoreError> {
        ContainersTab::new(self.loader.clone())
    }

    pub fn pods(&self) -> Result<PodsTab, CoreError> {
        PodsTab::new(self.loader.clone())
    }

    pub fn deployments(&self) -> Result<DeploymentsTab, CoreError> {
        DeploymentsTab::new(self.loader.clone())
    }

    pub fn vms(&self) -> Result<VmsTab, CoreError> {
        VmsTab::new(self.loader.clone())
    }

    pub fn cloud(&self) -> Result<CloudTab, CoreError> {
        CloudTab::new(self.loader.clone())
    }
}
