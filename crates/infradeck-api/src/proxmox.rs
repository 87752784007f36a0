// Proxmox VE endpoints
//
// Wire types for templates and VMs, plus power actions, deletion, and
// cloning. Lists are fetched by the core through its cached loader.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::gateway::Gateway;

pub mod paths {
    pub const TEMPLATES: &[&str] = &["templates"];
    pub const VMS: &[&str] = &["vms"];
}

// ── Wire types ───────────────────────────────────────────────────────

/// Clonable VM template from `GET /templates`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateResponse {
    /// Number or numeric string.
    pub vmid: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// VM from `GET /vms`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VmResponse {
    pub vmid: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "cpus")]
    pub maxcpu: Option<u32>,
    #[serde(default)]
    pub maxmem: Option<u64>,
    #[serde(default)]
    pub mem: Option<u64>,
    #[serde(default)]
    pub uptime: Option<u64>,
    #[serde(default)]
    pub template: Option<Value>,
}

/// Body for `POST /vms/clone`.
///
/// `storage` is only meaningful for a full clone; linked clones live on
/// the template's storage, so the field is left out entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloneVmBody {
    pub vmid: u32,
    pub newid: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_node: Option<String>,
    pub full: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

impl CloneVmBody {
    pub fn new(vmid: u32, newid: u32, name: impl Into<String>) -> Self {
        Self {
            vmid,
            newid,
            name: name.into(),
            target_node: None,
            full: false,
            storage: None,
        }
    }

    /// Request a full clone, optionally onto a named storage. An empty
    /// storage name means "same as the template".
    #[must_use]
    pub fn full(mut self, storage: Option<&str>) -> Self {
        self.full = true;
        self.storage = storage
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        self
    }

    #[must_use]
    pub fn on_node(mut self, node: impl Into<String>) -> Self {
        self.target_node = Some(node.into());
        self
    }
}

/// VM power actions, sent as the last path segment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum VmAction {
    Start,
    Stop,
    Shutdown,
    Reboot,
}

// ── Client ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProxmoxClient {
    gateway: Gateway,
}

impl ProxmoxClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// `POST /vms/{vmid}/{action}`
    pub async fn vm_action(&self, vmid: u32, action: VmAction) -> Result<(), Error> {
        debug!(vmid, %action, "VM power action");
        let id = vmid.to_string();
        self.gateway
            .send_empty(Method::POST, &["vms", &id, action.as_ref()])
            .await
    }

    /// `DELETE /vms/{vmid}`
    pub async fn delete_vm(&self, vmid: u32) -> Result<(), Error> {
        debug!(vmid, "deleting VM");
        let id = vmid.to_string();
        self.gateway.send_empty(Method::DELETE, &["vms", &id]).await
    }

    /// `POST /vms/clone`
    pub async fn clone_vm(&self, body: &CloneVmBody) -> Result<(), Error> {
        debug!(
            vmid = body.vmid,
            newid = body.newid,
            full = body.full,
            "cloning VM"
        );
        self.gateway
            .send(Method::POST, &["vms", "clone"], Some(body))
            .await
    }
}
