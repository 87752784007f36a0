// ── NAT domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

pub use infradeck_api::vyos::NatType;

use super::firewall::RuleId;

/// Wire sentinel for masquerade translation.
pub const MASQUERADE: &str = "masquerade";

/// What a matching packet's address is rewritten to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Translation {
    Address(String),
    /// Rewrite to the outbound interface's own address (source NAT only).
    Masquerade,
}

impl Translation {
    /// Parse the wire value; blank means "no translation".
    pub fn from_wire(raw: Option<String>) -> Option<Self> {
        let raw = raw.filter(|v| !v.trim().is_empty())?;
        if raw.eq_ignore_ascii_case(MASQUERADE) {
            Some(Self::Masquerade)
        } else {
            Some(Self::Address(raw))
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            Self::Address(a) => a.clone(),
            Self::Masquerade => MASQUERADE.to_owned(),
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(a) => f.write_str(a),
            Self::Masquerade => f.write_str(MASQUERADE),
        }
    }
}

/// One rule of a NAT table. `interface` is the outbound interface for
/// source NAT and the inbound interface for destination NAT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatRule {
    pub id: RuleId,
    pub nat_type: NatType,
    pub protocol: Option<String>,
    pub interface: Option<String>,
    pub source_address: Option<String>,
    pub source_port: Option<String>,
    pub destination_address: Option<String>,
    pub destination_port: Option<String>,
    pub translation: Option<Translation>,
    pub translation_port: Option<String>,
    pub description: String,
    pub disabled: bool,
}
