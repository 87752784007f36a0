// Cloud instance endpoints (Azure and AWS)
//
// One backend serves both providers under a provider path prefix.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::gateway::Gateway;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CloudProvider {
    Azure,
    Aws,
}

impl CloudProvider {
    /// `GET /{provider}/instances`
    pub fn instances_path(self) -> [&'static str; 2] {
        let provider: &'static str = self.into();
        [provider, "instances"]
    }
}

/// Instance from `GET /{provider}/instances`.
///
/// AWS reports `InstanceId`/`State`, Azure reports `vm_id`/`power_state`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstanceResponse {
    #[serde(alias = "InstanceId", alias = "instance_id", alias = "vm_id", alias = "vmId")]
    pub id: String,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "State", alias = "power_state", alias = "powerState")]
    pub state: Option<String>,
    #[serde(default, alias = "InstanceType", alias = "vm_size", alias = "size")]
    pub instance_type: Option<String>,
    #[serde(default, alias = "location", alias = "Region", alias = "AvailabilityZone")]
    pub region: Option<String>,
    #[serde(default, alias = "PublicIpAddress")]
    pub public_ip: Option<String>,
    #[serde(default, alias = "resourceGroup")]
    pub resource_group: Option<String>,
}

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
)]
#[strum(serialize_all = "lowercase")]
pub enum InstanceAction {
    Start,
    Stop,
}

#[derive(Debug, Clone)]
pub struct CloudClient {
    gateway: Gateway,
}

impl CloudClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// `POST /{provider}/instances/{id}/{start|stop}`
    pub async fn instance_action(
        &self,
        provider: CloudProvider,
        id: &str,
        action: InstanceAction,
    ) -> Result<(), Error> {
        debug!(%provider, instance = id, %action, "cloud instance action");
        self.gateway
            .send_empty(
                Method::POST,
                &[provider.as_ref(), "instances", id, action.as_ref()],
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_path() {
        assert_eq!(CloudProvider::Aws.instances_path(), ["aws", "instances"]);
        assert_eq!("azure".parse::<CloudProvider>().unwrap(), CloudProvider::Azure);
    }

    #[test]
    fn instance_accepts_aws_and_azure_shapes() {
        let aws: InstanceResponse = serde_json::from_value(json!({
            "InstanceId": "i-0abc",
            "State": "running",
            "InstanceType": "t3.micro"
        }))
        .unwrap();
        let azure: InstanceResponse = serde_json::from_value(json!({
            "vm_id": "vm-1",
            "name": "web",
            "power_state": "deallocated",
            "location": "westeurope"
        }))
        .unwrap();
        assert_eq!(aws.id, "i-0abc");
        assert_eq!(aws.instance_type.as_deref(), Some("t3.micro"));
        assert_eq!(azure.state.as_deref(), Some("deallocated"));
        assert_eq!(azure.region.as_deref(), Some("westeurope"));
    }
}
