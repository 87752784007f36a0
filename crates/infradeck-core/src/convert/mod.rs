// ── API-to-domain type conversions ──
//
// The normalization boundary. Raw list responses arrive in several shapes
// (a bare array, an envelope like `{"templates": [...]}`, or an object keyed
// by entity name) with field names that vary by backend build. Everything
// past this module sees one canonical shape.

mod vyos;
mod workloads;

pub use vyos::{address_groups, firewall_policies, interfaces, nat_rules, vlans, vrfs};
pub use workloads::{containers, deployments, images, instances, pods, vm_templates, vms};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;

// ── Helpers ────────────────────────────────────────────────────────

/// Flatten a list response into `(key, item)` pairs.
///
/// - array: every element, no key
/// - object carrying one of `fields` (or `data`): that member, recursively
///   one level
/// - any other object: keyed map, the member name is the key
/// - `null`: empty
pub(crate) fn entries<'a>(
    raw: &'a Value,
    fields: &[&str],
) -> Result<Vec<(Option<&'a str>, &'a Value)>, CoreError> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().map(|v| (None, v)).collect()),
        Value::Object(map) => {
            let envelope = fields
                .iter()
                .copied()
                .chain(std::iter::once("data"))
                .find_map(|f| map.get(f));
            match envelope {
                Some(Value::Array(items)) => Ok(items.iter().map(|v| (None, v)).collect()),
                Some(Value::Object(inner)) => {
                    Ok(inner.iter().map(|(k, v)| (Some(k.as_str()), v)).collect())
                }
                Some(Value::Null) => Ok(Vec::new()),
                Some(other) => Err(CoreError::decode(format!(
                    "expected a list, got {}",
                    kind_of(other)
                ))),
                None => Ok(map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect()),
            }
        }
        other => Err(CoreError::decode(format!(
            "expected a list, got {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn decode<T: DeserializeOwned>(what: &str, value: &Value) -> Result<T, CoreError> {
    T::deserialize(value).map_err(|e| CoreError::decode(format!("{what}: {e}")))
}

/// Number or numeric string.
pub(crate) fn value_to_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_to_u32(v: &Value) -> Option<u32> {
    value_to_u64(v).and_then(|n| u32::try_from(n).ok())
}

/// `true`/`false`, `1`/`0`, or their string spellings.
pub(crate) fn value_to_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// A name given either as a bare string or as an object such as
/// `{"name": "eth0"}` or `{"address-group": "TRUSTED"}`.
pub(crate) fn name_of(v: &Value, keys: &[&str]) -> Option<String> {
    let name = match v {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => keys.iter().find_map(|k| map.get(*k).and_then(Value::as_str)),
        _ => None,
    };
    name.filter(|s| !s.trim().is_empty()).map(str::to_owned)
}

/// Epoch seconds or an RFC 3339 string.
pub(crate) fn timestamp(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::Number(n) => n.as_i64().and_then(|ts| DateTime::from_timestamp(ts, 0)),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}
