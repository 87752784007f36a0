// ── Runtime connection configuration ──
//
// These types describe *where* each backend lives and *how* to talk to it.
// They carry credential data but never touch disk: `infradeck-config`
// builds a `ConsoleConfig` and hands it in.

use std::collections::BTreeMap;
use std::time::Duration;

use infradeck_api::Backend;
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed lab hosts).
    DangerAcceptInvalid,
}

/// Base URL and optional bearer token for one backend.
#[derive(Debug, Clone)]
pub struct BackendEndpoint {
    pub url: Url,
    pub token: Option<SecretString>,
}

impl BackendEndpoint {
    pub fn new(url: Url) -> Self {
        Self { url, token: None }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }
}

/// Everything a `Console` needs to reach its backends.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backends without an entry are treated as not configured.
    pub backends: BTreeMap<Backend, BackendEndpoint>,
    pub tls: TlsVerification,
    /// Per-request transport timeout; the only client-side deadline.
    pub timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backends: BTreeMap::new(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
