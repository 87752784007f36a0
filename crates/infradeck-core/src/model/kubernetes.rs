// ── Kubernetes domain types ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    pub namespace: String,
    /// Pod phase: `Running`, `Pending`, `Succeeded`, `Failed`, `Unknown`.
    pub status: String,
    pub node: Option<String>,
    pub ip: Option<String>,
    pub restarts: u32,
    /// `"ready/total"` containers, when reported.
    pub ready: Option<String>,
    pub age: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub namespace: String,
    pub replicas: u32,
    pub ready_replicas: u32,
    pub available_replicas: u32,
    pub image: Option<String>,
}

impl Deployment {
    pub fn is_rolled_out(&self) -> bool {
        self.ready_replicas >= self.replicas
    }
}
