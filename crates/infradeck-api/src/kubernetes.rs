// Kubernetes endpoints: pods and deployments.
//
// The backend flattens Kubernetes objects into small camelCase records.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::gateway::Gateway;

pub mod paths {
    pub const PODS: &[&str] = &["pods"];
    pub const DEPLOYMENTS: &[&str] = &["deployments"];
}

/// Pod from `GET /pods`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodResponse {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default, alias = "phase")]
    pub status: Option<String>,
    #[serde(default, alias = "nodeName", alias = "node_name")]
    pub node: Option<String>,
    #[serde(default, alias = "podIP", alias = "pod_ip")]
    pub ip: Option<String>,
    #[serde(default, alias = "restartCount", alias = "restart_count")]
    pub restarts: Option<u32>,
    /// `"1/2"` or a number of ready containers.
    #[serde(default)]
    pub ready: Option<Value>,
    #[serde(default, alias = "creationTimestamp", alias = "created")]
    pub age: Option<String>,
}

/// Deployment from `GET /deployments`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResponse {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default, alias = "desired")]
    pub replicas: Option<u32>,
    #[serde(default, alias = "ready_replicas")]
    pub ready_replicas: Option<u32>,
    #[serde(default, alias = "available_replicas")]
    pub available_replicas: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body for `PUT /deployments/{ns}/{name}/scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleBody {
    pub replicas: u32,
}

#[derive(Debug, Clone)]
pub struct KubernetesClient {
    gateway: Gateway,
}

impl KubernetesClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// `DELETE /pods/{ns}/{name}`
    pub async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), Error> {
        debug!(namespace, pod = name, "deleting pod");
        self.gateway
            .send_empty(Method::DELETE, &["pods", namespace, name])
            .await
    }

    /// `GET /pods/{ns}/{name}/logs?tail=N` (plain text).
    pub async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        tail: Option<u32>,
    ) -> Result<String, Error> {
        let params: Vec<(&str, String)> = tail
            .map(|n| vec![("tail", n.to_string())])
            .unwrap_or_default();
        self.gateway
            .get_text(&["pods", namespace, name, "logs"], &params)
            .await
    }

    /// `PUT /deployments/{ns}/{name}/scale`
    pub async fn scale_deployment(
        &self,
        namespace: &str,
        name: &str,
        replicas: u32,
    ) -> Result<(), Error> {
        debug!(namespace, deployment = name, replicas, "scaling deployment");
        self.gateway
            .send(
                Method::PUT,
                &["deployments", namespace, name, "scale"],
                Some(&ScaleBody { replicas }),
            )
            .await
    }

    /// `POST /deployments/{ns}/{name}/restart`
    pub async fn restart_deployment(&self, namespace: &str, name: &str) -> Result<(), Error> {
        debug!(namespace, deployment = name, "rollout restart");
        self.gateway
            .send_empty(Method::POST, &["deployments", namespace, name, "restart"])
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pod_accepts_camel_case() {
        let pod: PodResponse = serde_json::from_value(json!({
            "name": "api-7d9f",
            "namespace": "prod",
            "phase": "Running",
            "nodeName": "k8s-w1",
            "podIP": "10.42.0.7",
            "restartCount": 2
        }))
        .unwrap();
        assert_eq!(pod.status.as_deref(), Some("Running"));
        assert_eq!(pod.node.as_deref(), Some("k8s-w1"));
        assert_eq!(pod.restarts, Some(2));
        assert_eq!(pod.ip.as_deref(), Some("10.42.0.7"));
    }

    #[test]
    fn deployment_replica_counts() {
        let d: DeploymentResponse = serde_json::from_value(json!({
            "name": "api",
            "namespace": "prod",
            "replicas": 3,
            "readyReplicas": 2
        }))
        .unwrap();
        assert_eq!(d.replicas, Some(3));
        assert_eq!(d.ready_replicas, Some(2));
        assert_eq!(d.available_replicas, None);
    }
}
