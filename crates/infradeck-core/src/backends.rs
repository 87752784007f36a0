// ── Backend gateway registry ──
//
// One `Gateway` per configured backend. Backends without a base URL are
// simply absent; asking for one yields `BackendNotConfigured`.

use dashmap::DashMap;
use infradeck_api::{Backend, Gateway, TlsMode, TransportConfig};

use crate::config::{ConsoleConfig, TlsVerification};
use crate::error::CoreError;

#[derive(Debug, Default)]
pub struct Gateways {
    by_backend: DashMap<Backend, Gateway>,
}

impl Gateways {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a gateway for every backend named in `config`.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let gateways = Self::new();
        for (backend, endpoint) in &config.backends {
            let transport = TransportConfig {
                tls: tls_mode(&config.tls),
                timeout: config.timeout,
                token: endpoint.token.clone(),
            };
            let gateway = Gateway::new(endpoint.url.as_str(), &transport)?;
            gateways.insert(*backend, gateway);
        }
        Ok(gateways)
    }

    /// Add or replace the gateway for `backend`.
    pub fn insert(&self, backend: Backend, gateway: Gateway) {
        self.by_backend.insert(backend, gateway);
    }

    pub fn get(&self, backend: Backend) -> Result<Gateway, CoreError> {
        self.by_backend
            .get(&backend)
            .map(|g| g.value().clone())
            .ok_or(CoreError::BackendNotConfigured { backend })
    }

    pub fn is_configured(&self, backend: Backend) -> bool {
        self.by_backend.contains_key(&backend)
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
