//! Configuration for infradeck hosts.
//!
//! TOML profiles, per-backend token resolution (env + keyring +
//! plaintext), and translation to `infradeck_core::ConsoleConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use infradeck_core::{Backend, BackendEndpoint, ConsoleConfig, TlsVerification};

/// Keyring service name; entries are `<profile>/<backend>`.
pub const KEYRING_SERVICE: &str = "infradeck";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("profile '{profile}' configures no backends")]
    NoBackends { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when the host names none.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Where one backend lives and how to authenticate to it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendProfile {
    /// Base URL, e.g. "https://vyos.lab:8443/api".
    pub url: String,

    /// Bearer token (plaintext, prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable holding the token.
    pub token_env: Option<String>,
}

/// A named environment: one optional entry per backend.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    pub proxmox: Option<BackendProfile>,
    pub docker: Option<BackendProfile>,
    pub kubernetes: Option<BackendProfile>,
    pub vyos: Option<BackendProfile>,
    pub cloud: Option<BackendProfile>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override `defaults.insecure`.
    pub insecure: Option<bool>,

    /// Override `defaults.timeout`.
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn backend(&self, backend: Backend) -> Option<&BackendProfile> {
        match backend {
            Backend::Proxmox => self.proxmox.as_ref(),
            Backend::Docker => self.docker.as_ref(),
            Backend::Kubernetes => self.kubernetes.as_ref(),
            Backend::Vyos => self.vyos.as_ref(),
            Backend::Cloud => self.cloud.as_ref(),
        }
    }

    /// Configured backends, in declaration order.
    pub fn backends(&self) -> impl Iterator<Item = (Backend, &BackendProfile)> {
        [
            Backend::Proxmox,
            Backend::Docker,
            Backend::Kubernetes,
            Backend::Vyos,
            Backend::Cloud,
        ]
        .into_iter()
        .filter_map(|b| self.backend(b).map(|p| (b, p)))
    }
}

impl Config {
    /// Profile name to use: `requested`, else `default_profile`.
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested.or(self.default_profile.as_deref())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }

    /// Resolve a profile against `[defaults]` and build its console
    /// configuration.
    pub fn console_config(&self, requested: Option<&str>) -> Result<ConsoleConfig, ConfigError> {
        let name = self
            .profile_name(requested)
            .ok_or_else(|| ConfigError::Validation {
                field: "default_profile".into(),
                reason: "no profile requested and no default set".into(),
            })?;
        let profile = self.profile(name)?;
        let mut config = profile_to_console_config(profile, name)?;
        if profile.insecure.is_none() && self.defaults.insecure {
            config.tls = TlsVerification::DangerAcceptInvalid;
        }
        if profile.timeout.is_none() {
            config.timeout = Duration::from_secs(self.defaults.timeout);
        }
        Ok(config)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "infradeck", "infradeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("infradeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path` (if it exists), then `INFRADECK_*` variables.
/// Nested keys are separated by `__`, e.g.
/// `INFRADECK_PROFILES__LAB__VYOS__URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("INFRADECK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve one backend's token. Tokens are optional: `None` means the
/// backend is called without an `Authorization` header.
pub fn resolve_token(
    backend_profile: &BackendProfile,
    profile_name: &str,
    backend: Backend,
) -> Option<SecretString> {
    // 1. token_env → env var lookup
    if let Some(ref env_name) = backend_profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{backend}")) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    backend_profile
        .token
        .as_ref()
        .map(|t| SecretString::from(t.clone()))
}

/// Build a `ConsoleConfig` from a single profile, without `[defaults]`.
pub fn profile_to_console_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ConsoleConfig, ConfigError> {
    let mut config = ConsoleConfig::default();

    for (backend, backend_profile) in profile.backends() {
        let url: url::Url = backend_profile
            .url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: format!("{backend}.url"),
                reason: format!("invalid URL: {}", backend_profile.url),
            })?;
        let mut endpoint = BackendEndpoint::new(url);
        if let Some(token) = resolve_token(backend_profile, profile_name, backend) {
            endpoint = endpoint.with_token(token);
        }
        config.backends.insert(backend, endpoint);
    }

    if config.backends.is_empty() {
        return Err(ConfigError::NoBackends {
            profile: profile_name.into(),
        });
    }

    config.tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));

    Ok(config)
}
