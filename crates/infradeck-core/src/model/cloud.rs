// ── Cloud instance domain types ──

use serde::{Deserialize, Serialize};

pub use infradeck_api::CloudProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub provider: CloudProvider,
    pub id: String,
    pub name: String,
    pub state: Option<String>,
    pub instance_type: Option<String>,
    pub region: Option<String>,
    pub public_ip: Option<String>,
    /// Azure only.
    pub resource_group: Option<String>,
}
