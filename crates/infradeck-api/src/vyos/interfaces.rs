// VyOS interface endpoints: VLAN sub-interfaces and VRF instances.
// Plain interfaces are read-only here.

use reqwest::Method;
use tracing::debug;

use super::VyosClient;
use super::types::{VlanBody, VrfBody};
use crate::error::Error;

impl VyosClient {
    /// `POST /interfaces/vlans`
    pub async fn create_vlan(&self, body: &VlanBody) -> Result<(), Error> {
        debug!(parent = %body.parent, vlan_id = body.vlan_id, "creating VLAN");
        self.gateway
            .send(Method::POST, &["interfaces", "vlans"], Some(body))
            .await
    }

    /// `DELETE /interfaces/vlans/{parent}/{vid}`
    pub async fn delete_vlan(&self, parent: &str, vlan_id: u16) -> Result<(), Error> {
        let vid = vlan_id.to_string();
        self.gateway
            .send_empty(Method::DELETE, &["interfaces", "vlans", parent, &vid])
            .await
    }

    /// `POST /vrfs`
    pub async fn create_vrf(&self, body: &VrfBody) -> Result<(), Error> {
        debug!(vrf = %body.name, table = body.table, "creating VRF");
        self.gateway.send(Method::POST, &["vrfs"], Some(body)).await
    }

    /// `DELETE /vrfs/{name}`
    pub async fn delete_vrf(&self, name: &str) -> Result<(), Error> {
        self.gateway
            .send_empty(Method::DELETE, &["vrfs", name])
            .await
    }
}
