// VyOS responses: firewall, NAT, interfaces.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use infradeck_api::vyos::types::{
    AddressGroupResponse, FirewallPolicyResponse, FirewallRuleResponse, InterfaceResponse,
    NatRuleResponse, RuleEndpointResponse, VlanResponse, VrfResponse,
};

use super::{decode, entries, name_of, value_to_u32};
use crate::error::CoreError;
use crate::model::{
    Action, AddressGroup, Endpoint, FirewallPolicy, Interface, NatRule, NatType, Rule, RuleId,
    Translation, Vlan, Vrf,
};

const GROUP_KEYS: &[&str] = &["address-group", "address_group", "name"];

fn parse_action(raw: Option<&str>, what: &str) -> Result<Option<Action>, CoreError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Action>()
                .map_err(|_| CoreError::decode(format!("{what}: unknown action {s:?}")))
        })
        .transpose()
}

/// Rule id from the item itself, else from the key it was filed under.
fn rule_id(id: Option<&Value>, key: Option<&str>, what: &str) -> Result<RuleId, CoreError> {
    id.and_then(value_to_u32)
        .or_else(|| key.and_then(|k| k.trim().parse().ok()))
        .and_then(|n| RuleId::new(n).ok())
        .ok_or_else(|| CoreError::decode(format!("{what} without a valid rule id")))
}

fn endpoint(
    nested: Option<&RuleEndpointResponse>,
    flat_address: Option<String>,
    flat_group: Option<String>,
) -> Endpoint {
    let address = nested.and_then(|n| n.address.clone()).or(flat_address);
    let group = nested
        .and_then(|n| n.group.as_ref())
        .and_then(|g| name_of(g, GROUP_KEYS))
        .or(flat_group);
    Endpoint::from_parts(address, group)
}

/// `None` for a rule whose action this console cannot represent (VyOS
/// `jump`, `return`, `queue`); the rest of the policy still loads.
fn rule_from_response(
    policy: &str,
    key: Option<&str>,
    raw: FirewallRuleResponse,
) -> Result<Option<Rule>, CoreError> {
    let id = rule_id(raw.rule_id.as_ref(), key, "firewall rule")?;
    let Some(raw_action) = raw
        .action
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Err(CoreError::decode(format!(
            "firewall rule {policy}/{id} has no action"
        )));
    };
    let Ok(action) = raw_action.parse::<Action>() else {
        warn!(
            policy,
            rule_id = id.get(),
            action = raw_action,
            "skipping firewall rule with unsupported action"
        );
        return Ok(None);
    };

    let source_port = raw
        .source
        .as_ref()
        .and_then(|s| s.port.clone())
        .or(raw.source_port);
    let destination_port = raw
        .destination
        .as_ref()
        .and_then(|d| d.port.clone())
        .or(raw.destination_port);

    Ok(Some(Rule {
        id,
        action,
        source: endpoint(raw.source.as_ref(), raw.source_address, raw.source_group),
        destination: endpoint(
            raw.destination.as_ref(),
            raw.destination_address,
            raw.destination_group,
        ),
        source_port: source_port.filter(|p| !p.is_empty()),
        destination_port: destination_port.filter(|p| !p.is_empty()),
        protocol: raw.protocol.filter(|p| !p.is_empty()),
        description: raw.description.unwrap_or_default(),
        disabled: raw.disabled,
    }))
}

fn policy_from_response(
    key: Option<&str>,
    raw: FirewallPolicyResponse,
) -> Result<FirewallPolicy, CoreError> {
    let name = raw
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| key.map(str::to_owned))
        .ok_or_else(|| CoreError::decode("firewall policy without a name"))?;

    let mut rules = HashMap::new();
    for (rule_key, rule) in raw.rules.into_entries() {
        if let Some(rule) = rule_from_response(&name, rule_key.as_deref(), rule)? {
            rules.insert(rule.id, rule);
        }
    }

    Ok(FirewallPolicy {
        default_action: parse_action(raw.default_action.as_deref(), &name)?.unwrap_or_default(),
        name,
        description: raw.description.unwrap_or_default(),
        disabled: raw.disabled,
        rules,
    })
}

/// `GET /firewall/policies` into policies. Rules may arrive keyed by id
/// or as an array; both end up in the policy's rule map.
pub fn firewall_policies(raw: &Value) -> Result<Vec<FirewallPolicy>, CoreError> {
    entries(raw, &["policies"])?
        .into_iter()
        .map(|(key, item)| {
            let resp: FirewallPolicyResponse = decode("firewall policy", item)?;
            policy_from_response(key, resp)
        })
        .collect()
}

pub fn address_groups(raw: &Value) -> Result<Vec<AddressGroup>, CoreError> {
    entries(raw, &["address_groups", "groups"])?
        .into_iter()
        .map(|(key, item)| {
            let resp: AddressGroupResponse = decode("address group", item)?;
            let name = resp
                .name
                .or_else(|| key.map(str::to_owned))
                .ok_or_else(|| CoreError::decode("address group without a name"))?;
            Ok(AddressGroup {
                name,
                addresses: resp.addresses.map(|a| a.into_vec()).unwrap_or_default(),
                description: resp.description.unwrap_or_default(),
            })
        })
        .collect()
}

// ── NAT ────────────────────────────────────────────────────────────

fn nat_rule_from_response(
    key: Option<&str>,
    raw: NatRuleResponse,
    nat_type: NatType,
) -> Result<NatRule, CoreError> {
    let id = rule_id(raw.rule_id.as_ref(), key, "NAT rule")?;

    let interface = match nat_type {
        NatType::Source => raw.outbound.as_ref().or(raw.inbound.as_ref()),
        NatType::Destination => raw.inbound.as_ref().or(raw.outbound.as_ref()),
    }
    .and_then(|v| name_of(v, &["name", "interface"]));

    let (src, dst, xlat) = (
        raw.source.as_ref(),
        raw.destination.as_ref(),
        raw.translation.as_ref(),
    );
    let blank = |s: Option<String>| s.filter(|v| !v.is_empty());

    let mut rule = NatRule {
        id,
        nat_type,
        protocol: blank(raw.protocol),
        interface,
        source_address: blank(src.and_then(|e| e.address.clone()).or(raw.source_address)),
        source_port: blank(src.and_then(|e| e.port.clone()).or(raw.source_port)),
        destination_address: blank(
            dst.and_then(|e| e.address.clone())
                .or(raw.destination_address),
        ),
        destination_port: blank(dst.and_then(|e| e.port.clone()).or(raw.destination_port)),
        translation: Translation::from_wire(
            xlat.and_then(|e| e.address.clone())
                .or(raw.translation_address),
        ),
        translation_port: blank(xlat.and_then(|e| e.port.clone()).or(raw.translation_port)),
        description: raw.description.unwrap_or_default(),
        disabled: raw.disabled,
    };

    // Some builds echo `masquerade` on destination rules; it has no
    // meaning there.
    if nat_type == NatType::Destination && rule.translation == Some(Translation::Masquerade) {
        rule.translation = None;
    }
    Ok(rule)
}

/// `GET /nat/{type}/rules`, sorted by rule id.
pub fn nat_rules(raw: &Value, nat_type: NatType) -> Result<Vec<NatRule>, CoreError> {
    let mut rules = entries(raw, &["rules"])?
        .into_iter()
        .map(|(key, item)| {
            let resp: NatRuleResponse = decode("NAT rule", item)?;
            nat_rule_from_response(key, resp, nat_type)
        })
        .collect::<Result<Vec<_>, _>>()?;
    rules.sort_by_key(|r| r.id);
    Ok(rules)
}

// ── Interfaces ─────────────────────────────────────────────────────

fn link_state(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u/u" | "true" => Some(true),
            "down" | "a/d" | "u/d" | "d/d" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn interfaces(raw: &Value) -> Result<Vec<Interface>, CoreError> {
    entries(raw, &["interfaces"])?
        .into_iter()
        .map(|(key, item)| {
            let resp: InterfaceResponse = decode("interface", item)?;
            let name = resp
                .name
                .or_else(|| key.map(str::to_owned))
                .ok_or_else(|| CoreError::decode("interface without a name"))?;
            Ok(Interface {
                name,
                kind: resp.kind,
                addresses: resp.addresses.map(|a| a.into_vec()).unwrap_or_default(),
                description: resp.description.unwrap_or_default(),
                vrf: resp.vrf,
                mtu: resp.mtu,
                mac: resp.mac,
                up: resp.status.as_ref().and_then(link_state),
            })
        })
        .collect()
}

pub fn vlans(raw: &Value) -> Result<Vec<Vlan>, CoreError> {
    entries(raw, &["vlans"])?
        .into_iter()
        .map(|(_, item)| {
            let resp: VlanResponse = decode("VLAN", item)?;
            let parent = resp
                .parent
                .ok_or_else(|| CoreError::decode("VLAN without a parent interface"))?;
            let vlan_id = resp
                .vlan_id
                .as_ref()
                .and_then(value_to_u32)
                .and_then(|n| u16::try_from(n).ok())
                .filter(|n| (1..=4094).contains(n))
                .ok_or_else(|| CoreError::decode(format!("VLAN on {parent} without a valid id")))?;
            Ok(Vlan {
                parent,
                vlan_id,
                addresses: resp.addresses.map(|a| a.into_vec()).unwrap_or_default(),
                description: resp.description.unwrap_or_default(),
            })
        })
        .collect()
}

pub fn vrfs(raw: &Value) -> Result<Vec<Vrf>, CoreError> {
    entries(raw, &["vrfs"])?
        .into_iter()
        .map(|(key, item)| {
            let resp: VrfResponse = decode("VRF", item)?;
            let name = resp
                .name
                .or_else(|| key.map(str::to_owned))
                .ok_or_else(|| CoreError::decode("VRF without a name"))?;
            Ok(Vrf {
                name,
                table: resp.table.as_ref().and_then(value_to_u32),
                description: resp.description.unwrap_or_default(),
                interfaces: resp.interfaces.map(|i| i.into_vec()).unwrap_or_default(),
            })
        })
        .collect()
}
