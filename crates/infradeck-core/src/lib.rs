//! Resource state and mutation coordinator between `infradeck-api` and a UI
//! host.
//!
//! - **[`Console`]**: session root. Owns the [`ResponseCache`] and the
//!   per-backend [`Gateways`], and vends one tab service per resource view
//!   ([`FirewallTab`], [`NatTab`], [`VmsTab`], ...).
//!
//! - **[`CachedLoader`]**: cache-or-fetch for list endpoints, keyed by
//!   [`CacheKey`]. A forced refresh invalidates before it fetches; only a
//!   successful fetch writes the cache.
//!
//! - **[`ActionTracker`]**: one in-flight mutation per [`ActionKey`]. The
//!   RAII [`ActionGuard`] frees the key however the call ends, and the busy
//!   set is published on a `watch` channel for UI affordances.
//!
//! - **Domain model** ([`model`]): canonical types built from raw responses
//!   by the [`convert`] normalization boundary.
//!
//! Firewall rule edits are delete-then-add and are not atomic; see
//! [`FirewallTab::edit_rule`].

pub mod action;
pub mod backends;
pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod model;
pub mod requests;
pub mod store;
pub mod tabs;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{ActionGuard, ActionKey, ActionTracker};
pub use backends::Gateways;
pub use config::{BackendEndpoint, ConsoleConfig, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use requests::{CloneVmRequest, NatRuleSpec, PolicyUpdate, RuleSpec};
pub use store::{CacheKey, CachedLoader, ResponseCache};
pub use tabs::{
    CloudTab, ContainersTab, DeploymentsTab, FirewallTab, InterfacesTab, NatTab, PodsTab, VmsTab,
};

pub use infradeck_api::Backend;
pub use infradeck_api::docker::ContainerAction;
pub use infradeck_api::proxmox::VmAction;

pub use model::{
    // Firewall
    Action,
    AddressGroup,
    // Cloud
    CloudProvider,
    // Docker
    Container,
    ContainerState,
    // Kubernetes
    Deployment,
    Endpoint,
    FirewallPolicy,
    Image,
    Instance,
    // VyOS interfaces
    Interface,
    // NAT
    NatRule,
    NatType,
    Pod,
    Rule,
    RuleId,
    Translation,
    Vlan,
    // Proxmox
    Vm,
    VmTemplate,
    Vrf,
};
