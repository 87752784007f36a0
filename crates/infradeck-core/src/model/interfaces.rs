// ── VyOS interface domain types ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    /// `ethernet`, `bridge`, `wireguard`, ...
    pub kind: Option<String>,
    pub addresses: Vec<String>,
    pub description: String,
    pub vrf: Option<String>,
    pub mtu: Option<u32>,
    pub mac: Option<String>,
    /// `None` when the router did not report link state.
    pub up: Option<bool>,
}

/// 802.1Q sub-interface of a parent interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub parent: String,
    pub vlan_id: u16,
    pub addresses: Vec<String>,
    pub description: String,
}

impl Vlan {
    /// Kernel interface name, e.g. `eth1.30`.
    pub fn ifname(&self) -> String {
        format!("{}.{}", self.parent, self.vlan_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vrf {
    pub name: String,
    pub table: Option<u32>,
    pub description: String,
    pub interfaces: Vec<String>,
}
