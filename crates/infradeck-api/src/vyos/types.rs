// VyOS API wire types
//
// Responses from the router API are inconsistent across versions: rules may
// arrive as a map keyed by id or as an array, group references may be a bare
// name or VyOS's native `{"address-group": "NAME"}` object, and field names
// switch between snake_case and the hyphenated config-tree spelling. The
// types here accept every observed shape; `infradeck-core::convert` turns
// them into one canonical model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Shape helpers ────────────────────────────────────────────────────

/// A collection delivered either as an array or as an object keyed by the
/// entity's identifier (rule id, group name).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum KeyedList<T> {
    Map(HashMap<String, T>),
    List(Vec<T>),
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl<T> KeyedList<T> {
    /// Flatten into `(key, item)` pairs. Array entries carry no key.
    pub fn into_entries(self) -> Vec<(Option<String>, T)> {
        match self {
            Self::Map(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
            Self::List(items) => items.into_iter().map(|v| (None, v)).collect(),
        }
    }
}

/// A field that is sometimes a single value and sometimes a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(v) => vec![v],
            Self::Many(v) => v,
        }
    }
}

// ── Firewall ─────────────────────────────────────────────────────────

/// Firewall policy (named rule set) from `GET /firewall/policies`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FirewallPolicyResponse {
    /// Absent when the list arrives keyed by name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "default-action")]
    pub default_action: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, alias = "rule")]
    pub rules: KeyedList<FirewallRuleResponse>,
}

/// One rule inside a policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FirewallRuleResponse {
    /// Number or numeric string; absent when keyed by id.
    #[serde(default, alias = "id")]
    pub rule_id: Option<Value>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub disabled: bool,

    // Nested shape: `source: {address, group, port}`
    #[serde(default)]
    pub source: Option<RuleEndpointResponse>,
    #[serde(default)]
    pub destination: Option<RuleEndpointResponse>,

    // Flat shape used by older API builds
    #[serde(default)]
    pub source_address: Option<String>,
    #[serde(default)]
    pub source_group: Option<String>,
    #[serde(default)]
    pub source_port: Option<String>,
    #[serde(default)]
    pub destination_address: Option<String>,
    #[serde(default)]
    pub destination_group: Option<String>,
    #[serde(default)]
    pub destination_port: Option<String>,
}

/// Match criteria for one side of a rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleEndpointResponse {
    #[serde(default)]
    pub address: Option<String>,
    /// Bare group name or `{"address-group": "NAME"}`.
    #[serde(default)]
    pub group: Option<Value>,
    #[serde(default)]
    pub port: Option<String>,
}

/// Address group from `GET /firewall/address-groups`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressGroupResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "address")]
    pub addresses: Option<OneOrMany<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST /firewall/policies/{name}`. The name travels in both
/// the path and the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyCreateBody {
    pub name: String,
    pub default_action: String,
    pub description: String,
}

/// Body for `PUT /firewall/policies/{name}`. The name is immutable and
/// only travels in the path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolicyUpdateBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `POST /firewall/policies/{name}/rules`.
///
/// Both the address and the group field of each side are always sent; an
/// empty string clears that field on the router.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleBody {
    pub rule_id: u32,
    pub action: String,
    pub source_address: String,
    pub source_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    pub destination_address: String,
    pub destination_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    pub description: String,
}

/// Body for address group create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressGroupBody {
    pub name: String,
    pub addresses: Vec<String>,
    pub description: String,
}

// ── NAT ──────────────────────────────────────────────────────────────

/// NAT rule from `GET /nat/{type}/rules`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NatRuleResponse {
    #[serde(default, alias = "id")]
    pub rule_id: Option<Value>,
    #[serde(default)]
    pub protocol: Option<String>,
    /// Plain name or VyOS 1.4's `{"name": "eth0"}`.
    #[serde(default, alias = "outbound_interface", alias = "outbound-interface")]
    pub outbound: Option<Value>,
    #[serde(default, alias = "inbound_interface", alias = "inbound-interface")]
    pub inbound: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub source: Option<NatEndpointResponse>,
    #[serde(default)]
    pub destination: Option<NatEndpointResponse>,
    #[serde(default)]
    pub translation: Option<NatEndpointResponse>,

    #[serde(default)]
    pub source_address: Option<String>,
    #[serde(default)]
    pub source_port: Option<String>,
    #[serde(default)]
    pub destination_address: Option<String>,
    #[serde(default)]
    pub destination_port: Option<String>,
    #[serde(default)]
    pub translation_address: Option<String>,
    #[serde(default)]
    pub translation_port: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NatEndpointResponse {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
}

/// Body for NAT rule create (`POST`) and update (`PUT`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NatRuleBody {
    pub rule_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbound_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Interfaces, VLANs, VRFs ──────────────────────────────────────────

/// Interface from `GET /interfaces`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InterfaceResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "address")]
    pub addresses: Option<OneOrMany<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vrf: Option<String>,
    #[serde(default)]
    pub mtu: Option<u32>,
    #[serde(default, alias = "hw-id", alias = "hw_id")]
    pub mac: Option<String>,
    /// `"up"`/`"down"` or a boolean, depending on the build.
    #[serde(default, alias = "state")]
    pub status: Option<Value>,
}

/// VLAN sub-interface (`vif`) from `GET /interfaces/vlans`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VlanResponse {
    #[serde(default, alias = "interface")]
    pub parent: Option<String>,
    #[serde(default, alias = "vif", alias = "vid")]
    pub vlan_id: Option<Value>,
    #[serde(default, alias = "address")]
    pub addresses: Option<OneOrMany<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

/// VRF instance from `GET /vrfs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VrfResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub table: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "interface")]
    pub interfaces: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VlanBody {
    pub parent: String,
    pub vlan_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VrfBody {
    pub name: String,
    pub table: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn policy_accepts_rules_keyed_by_id() {
        let raw = json!({
            "name": "WAN_IN",
            "default-action": "drop",
            "rule": {
                "10": { "action": "accept", "source": { "group": { "address-group": "TRUSTED" } } }
            }
        });
        let policy: FirewallPolicyResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(policy.default_action.as_deref(), Some("drop"));
        let entries = policy.rules.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.as_deref(), Some("10"));
    }

    #[test]
    fn policy_accepts_rules_as_array() {
        let raw = json!({
            "name": "LAN_OUT",
            "rules": [ { "rule_id": 5, "action": "drop", "source_address": "10.0.0.0/8" } ]
        });
        let policy: FirewallPolicyResponse = serde_json::from_value(raw).unwrap();
        let entries = policy.rules.into_entries();
        assert!(entries[0].0.is_none());
        assert_eq!(entries[0].1.rule_id, Some(json!(5)));
        assert_eq!(entries[0].1.source_address.as_deref(), Some("10.0.0.0/8"));
    }

    #[test]
    fn missing_rules_default_to_empty() {
        let policy: FirewallPolicyResponse =
            serde_json::from_value(json!({ "name": "EMPTY" })).unwrap();
        assert!(policy.rules.into_entries().is_empty());
    }

    #[test]
    fn single_address_is_accepted_for_groups() {
        let group: AddressGroupResponse =
            serde_json::from_value(json!({ "name": "DNS", "address": "1.1.1.1" })).unwrap();
        assert_eq!(group.addresses.unwrap().into_vec(), vec!["1.1.1.1"]);
    }

    #[test]
    fn policy_update_body_omits_untouched_fields() {
        let body = PolicyUpdateBody {
            description: Some("edge".into()),
            ..PolicyUpdateBody::default()
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "description": "edge" }));
    }
}
