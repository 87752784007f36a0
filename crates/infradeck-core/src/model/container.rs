// ── Docker domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Container lifecycle state as reported by the engine.
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
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    #[default]
    Unknown,
}

impl ContainerState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running | Self::Restarting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    /// Primary name without the engine's leading `/`.
    pub name: String,
    pub image: Option<String>,
    pub state: ContainerState,
    /// Human status line, e.g. `"Up 3 hours"`.
    pub status: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl Container {
    /// First 12 hex digits, the way `docker ps` shows ids.
    pub fn short_id(&self) -> &str {
        let id = self.id.strip_prefix("sha256:").unwrap_or(&self.id);
        id.get(..12).unwrap_or(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    /// `repo:tag` references; empty for dangling images.
    pub tags: Vec<String>,
    pub size: Option<u64>,
    pub created: Option<DateTime<Utc>>,
}
