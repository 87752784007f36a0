// ── Typed mutation requests ──
//
// What a UI form produces. Each request validates itself and renders the
// wire body for its endpoint, so tabs never hand-assemble JSON.

use serde::{Deserialize, Serialize};

use infradeck_api::proxmox::CloneVmBody;
use infradeck_api::vyos::types::{NatRuleBody, PolicyUpdateBody, RuleBody};

use crate::error::CoreError;
use crate::model::{Action, Endpoint, NatType, Rule, RuleId, Translation};

fn require_name(what: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

fn blank_to_none(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

// ── Firewall ───────────────────────────────────────────────────────

/// Fields of a firewall rule, minus its id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSpec {
    pub action: Action,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub source_port: Option<String>,
    pub destination_port: Option<String>,
    pub protocol: Option<String>,
    pub description: String,
}

impl RuleSpec {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (side, endpoint) in [("source", &self.source), ("destination", &self.destination)] {
            match endpoint {
                Endpoint::Address(a) if a.trim().is_empty() => {
                    return Err(CoreError::validation(format!("{side} address is empty")));
                }
                Endpoint::Group(g) if g.trim().is_empty() => {
                    return Err(CoreError::validation(format!("{side} group is empty")));
                }
                _ => {}
            }
        }
        let has_port = self.source_port.is_some() || self.destination_port.is_some();
        let portless = matches!(self.protocol.as_deref(), None | Some("all" | "icmp"));
        if has_port && portless {
            return Err(CoreError::validation(
                "ports require protocol tcp, udp, or tcp_udp",
            ));
        }
        Ok(())
    }

    /// Wire body for `POST .../rules`. Both address and group fields are
    /// always present; the unused one is `""`.
    pub fn to_body(&self, id: RuleId) -> RuleBody {
        let (source_address, source_group) = self.source.wire_fields();
        let (destination_address, destination_group) = self.destination.wire_fields();
        RuleBody {
            rule_id: id.get(),
            action: self.action.to_string(),
            source_address,
            source_group,
            source_port: blank_to_none(self.source_port.as_ref()),
            destination_address,
            destination_group,
            destination_port: blank_to_none(self.destination_port.as_ref()),
            protocol: blank_to_none(self.protocol.as_ref()),
            description: self.description.clone(),
        }
    }
}

impl From<&Rule> for RuleSpec {
    fn from(rule: &Rule) -> Self {
        Self {
            action: rule.action,
            source: rule.source.clone(),
            destination: rule.destination.clone(),
            source_port: rule.source_port.clone(),
            destination_port: rule.destination_port.clone(),
            protocol: rule.protocol.clone(),
            description: rule.description.clone(),
        }
    }
}

/// Partial policy update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyUpdate {
    pub default_action: Option<Action>,
    pub description: Option<String>,
}

impl PolicyUpdate {
    pub fn is_empty(&self) -> bool {
        self.default_action.is_none() && self.description.is_none()
    }

    pub fn to_body(&self) -> PolicyUpdateBody {
        PolicyUpdateBody {
            default_action: self.default_action.map(|a| a.to_string()),
            description: self.description.clone(),
        }
    }
}

pub(crate) fn validate_policy_name(name: &str) -> Result<(), CoreError> {
    require_name("policy name", name)?;
    if name.chars().any(char::is_whitespace) {
        return Err(CoreError::validation("policy name must not contain spaces"));
    }
    Ok(())
}

pub(crate) fn validate_group_name(name: &str) -> Result<(), CoreError> {
    require_name("address group name", name)
}

// ── NAT ────────────────────────────────────────────────────────────

/// Fields of a NAT rule, minus its id and table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NatRuleSpec {
    pub protocol: Option<String>,
    /// Outbound interface for source NAT, inbound for destination NAT.
    pub interface: Option<String>,
    pub source_address: Option<String>,
    pub source_port: Option<String>,
    pub destination_address: Option<String>,
    pub destination_port: Option<String>,
    pub translation: Option<Translation>,
    pub translation_port: Option<String>,
    pub description: Option<String>,
}

impl NatRuleSpec {
    pub fn validate(&self, nat_type: NatType) -> Result<(), CoreError> {
        if nat_type == NatType::Destination && self.translation == Some(Translation::Masquerade) {
            return Err(CoreError::validation(
                "masquerade is only valid for source NAT",
            ));
        }
        if let Some(Translation::Address(a)) = &self.translation {
            require_name("translation address", a)?;
        }
        Ok(())
    }

    pub fn to_body(&self, nat_type: NatType, id: RuleId) -> NatRuleBody {
        let interface = blank_to_none(self.interface.as_ref());
        let (outbound_interface, inbound_interface) = match nat_type {
            NatType::Source => (interface, None),
            NatType::Destination => (None, interface),
        };
        NatRuleBody {
            rule_id: id.get(),
            protocol: blank_to_none(self.protocol.as_ref()),
            outbound_interface,
            inbound_interface,
            source_address: blank_to_none(self.source_address.as_ref()),
            source_port: blank_to_none(self.source_port.as_ref()),
            destination_address: blank_to_none(self.destination_address.as_ref()),
            destination_port: blank_to_none(self.destination_port.as_ref()),
            translation_address: self.translation.as_ref().map(Translation::to_wire),
            translation_port: blank_to_none(self.translation_port.as_ref()),
            description: blank_to_none(self.description.as_ref()),
        }
    }
}

// ── Proxmox ────────────────────────────────────────────────────────

/// Clone a template (or VM) into a new VM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneVmRequest {
    pub source_vmid: u32,
    pub new_vmid: u32,
    pub name: String,
    pub target_node: Option<String>,
    /// Full clone (independent disks) instead of a linked clone.
    pub full: bool,
    /// Only honored for full clones.
    pub storage: Option<String>,
}

impl CloneVmRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_name("VM name", &self.name)?;
        // Proxmox reserves ids below 100.
        if self.new_vmid < 100 {
            return Err(CoreError::validation("new VM id must be 100 or greater"));
        }
        if self.new_vmid == self.source_vmid {
            return Err(CoreError::validation(
                "new VM id must differ from the source",
            ));
        }
        Ok(())
    }

    pub fn to_body(&self) -> CloneVmBody {
        let mut body = CloneVmBody::new(self.source_vmid, self.new_vmid, self.name.trim());
        if self.full {
            body = body.full(self.storage.as_deref());
        }
        if let Some(node) = blank_to_none(self.target_node.as_ref()) {
            body = body.on_node(node);
        }
        body
    }
}
