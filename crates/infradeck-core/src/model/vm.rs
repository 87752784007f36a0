// ── Proxmox domain types ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmTemplate {
    pub vmid: u32,
    pub name: String,
    pub node: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    pub vmid: u32,
    pub name: String,
    pub node: Option<String>,
    /// `running`, `stopped`, `paused`.
    pub status: String,
    pub cpus: Option<u32>,
    pub max_mem: Option<u64>,
    pub mem: Option<u64>,
    pub uptime: Option<u64>,
    pub template: bool,
}

impl Vm {
    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case("running")
    }
}
