// Docker host endpoints
//
// The backend proxies the Docker Engine API, so list items mostly keep the
// engine's PascalCase field names; newer builds re-emit them in snake_case.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::gateway::Gateway;

pub mod paths {
    pub const CONTAINERS: &[&str] = &["containers"];
    pub const IMAGES: &[&str] = &["images"];
}

/// Container from `GET /containers`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContainerResponse {
    #[serde(alias = "Id", alias = "ID")]
    pub id: String,
    /// Engine-style names carry a leading `/`.
    #[serde(default, alias = "Names")]
    pub names: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "Image")]
    pub image: Option<String>,
    #[serde(default, alias = "State")]
    pub state: Option<String>,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    /// Unix seconds or an RFC 3339 string.
    #[serde(default, alias = "Created")]
    pub created: Option<Value>,
    #[serde(default, alias = "Ports")]
    pub ports: Vec<Value>,
}

/// Image from `GET /images`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageResponse {
    #[serde(alias = "Id", alias = "ID")]
    pub id: String,
    #[serde(default, alias = "RepoTags")]
    pub repo_tags: Option<Vec<String>>,
    #[serde(default, alias = "Size")]
    pub size: Option<u64>,
    #[serde(default, alias = "Created")]
    pub created: Option<Value>,
}

/// Container lifecycle actions, sent as the last path segment.
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
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
}

#[derive(Debug, Clone)]
pub struct DockerClient {
    gateway: Gateway,
}

impl DockerClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// `POST /containers/{id}/{action}`
    pub async fn container_action(&self, id: &str, action: ContainerAction) -> Result<(), Error> {
        debug!(container = id, %action, "container action");
        self.gateway
            .send_empty(Method::POST, &["containers", id, action.as_ref()])
            .await
    }

    /// `DELETE /containers/{id}`
    pub async fn remove_container(&self, id: &str) -> Result<(), Error> {
        debug!(container = id, "removing container");
        self.gateway
            .send_empty(Method::DELETE, &["containers", id])
            .await
    }

    /// `GET /containers/{id}/logs?tail=N` (plain text).
    pub async fn container_logs(&self, id: &str, tail: Option<u32>) -> Result<String, Error> {
        let params: Vec<(&str, String)> = tail
            .map(|n| vec![("tail", n.to_string())])
            .unwrap_or_default();
        self.gateway
            .get_text(&["containers", id, "logs"], &params)
            .await
    }
}
