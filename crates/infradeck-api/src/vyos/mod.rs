// VyOS router API client
//
// Firewall policies/rules, address groups, NAT, interfaces, VLANs, and VRFs.
// List endpoints are exposed as path constants: the core fetches them through
// its cached loader. Mutations are inherent methods split across the
// sibling files, one per resource family.

mod firewall;
mod interfaces;
mod nat;
pub mod types;

use crate::gateway::Gateway;

pub use nat::NatType;

/// Collection paths, relative to the VyOS API base URL.
pub mod paths {
    pub const FIREWALL_POLICIES: &[&str] = &["firewall", "policies"];
    pub const ADDRESS_GROUPS: &[&str] = &["firewall", "address-groups"];
    pub const INTERFACES: &[&str] = &["interfaces"];
    pub const VLANS: &[&str] = &["interfaces", "vlans"];
    pub const VRFS: &[&str] = &["vrfs"];
    pub const SOURCE_NAT: &[&str] = &["nat", "source", "rules"];
    pub const DESTINATION_NAT: &[&str] = &["nat", "destination", "rules"];
}

/// Async client for the VyOS configuration API.
#[derive(Debug, Clone)]
pub struct VyosClient {
    gateway: Gateway,
}

impl VyosClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}
