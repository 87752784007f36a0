// ── Canonical domain model ──
//
// Mirrors of backend state, replaced wholesale on every reload. Built from
// raw responses by `crate::convert`.

pub mod cloud;
pub mod container;
pub mod firewall;
pub mod interfaces;
pub mod kubernetes;
pub mod nat;
pub mod vm;

pub use cloud::{CloudProvider, Instance};
pub use container::{Container, ContainerState, Image};
pub use firewall::{Action, AddressGroup, Endpoint, FirewallPolicy, Rule, RuleId};
pub use interfaces::{Interface, Vlan, Vrf};
pub use kubernetes::{Deployment, Pod};
pub use nat::{MASQUERADE, NatRule, NatType, Translation};
pub use vm::{Vm, VmTemplate};
