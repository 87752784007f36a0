// ── Firewall domain types ──

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Verdict of a rule, or of a policy when no rule matches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Action {
    Accept,
    #[default]
    Drop,
    Reject,
}

/// User-assigned rule number. Positive, unique within its policy, and the
/// sort key for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RuleId(NonZeroU32);

impl RuleId {
    pub fn new(id: u32) -> Result<Self, CoreError> {
        NonZeroU32::new(id)
            .map(Self)
            .ok_or_else(|| CoreError::validation("rule id must be a positive integer"))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for RuleId {
    type Error = CoreError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<RuleId> for u32 {
    fn from(id: RuleId) -> Self {
        id.get()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One side of a rule match. A side matches either a literal address, a
/// named address group, or anything; never both an address and a group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Endpoint {
    #[default]
    Any,
    Address(String),
    Group(String),
}

impl Endpoint {
    /// Build from the two optional wire fields. Blank strings count as
    /// absent. If a backend reports both, the group wins.
    pub fn from_parts(address: Option<String>, group: Option<String>) -> Self {
        let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        match (non_blank(address), non_blank(group)) {
            (_, Some(group)) => Self::Group(group),
            (Some(address), None) => Self::Address(address),
            (None, None) => Self::Any,
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Group(g) => Some(g),
            _ => None,
        }
    }

    /// `(address, group)` as sent to the router: the unused field is `""`
    /// so a replaced rule never keeps a stale value.
    pub fn wire_fields(&self) -> (String, String) {
        match self {
            Self::Any => (String::new(), String::new()),
            Self::Address(a) => (a.clone(), String::new()),
            Self::Group(g) => (String::new(), g.clone()),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Address(a) => f.write_str(a),
            Self::Group(g) => write!(f, "@{g}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub action: Action,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub source_port: Option<String>,
    pub destination_port: Option<String>,
    pub protocol: Option<String>,
    pub description: String,
    pub disabled: bool,
}

/// A named, ordered rule set with a default verdict.
///
/// The policy's own `disabled` flag is independent of its rules' flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallPolicy {
    pub name: String,
    pub default_action: Action,
    pub description: String,
    pub disabled: bool,
    pub rules: HashMap<RuleId, Rule>,
}

impl FirewallPolicy {
    /// Rules in ascending id order, the order the router evaluates them.
    pub fn ordered_rules(&self) -> Vec<&Rule> {
        let mut rules: Vec<&Rule> = self.rules.values().collect();
        rules.sort_by_key(|r| r.id);
        rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    /// Smallest multiple of 10 above the highest existing id, the usual
    /// VyOS numbering convention for appending a rule.
    pub fn next_rule_id(&self) -> RuleId {
        let highest = self.rules.keys().map(|id| id.get()).max().unwrap_or(0);
        let next = (highest / 10 + 1).saturating_mul(10);
        RuleId(NonZeroU32::new(next).unwrap_or(NonZeroU32::MAX))
    }
}

/// A named, ordered list of addresses/CIDRs that rules can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressGroup {
    pub name: String,
    pub addresses: Vec<String>,
    pub description: String,
}
