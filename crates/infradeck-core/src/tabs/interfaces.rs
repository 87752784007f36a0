// ── Interfaces tab ──

use infradeck_api::vyos::paths;
use infradeck_api::vyos::types::{VlanBody, VrfBody};
use infradeck_api::{Backend, VyosClient};

use super::TabContext;
use crate::action::{ActionKey, ActionTracker};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Interface, Vlan, Vrf};
use crate::store::{CacheKey, CachedLoader};

/// Action key for a VLAN: its interface name, `"<parent>.<vid>"`.
pub fn vlan_key(parent: &str, vlan_id: u16) -> ActionKey {
    ActionKey::from(format!("{parent}.{vlan_id}").as_str())
}

pub fn vrf_key(name: &str) -> ActionKey {
    ActionKey::new("vrf", name)
}

#[derive(Debug, Clone)]
pub struct InterfacesTab {
    ctx: TabContext,
}

impl InterfacesTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Vyos)?,
        })
    }

    fn vyos(&self) -> Result<VyosClient, CoreError> {
        self.ctx.gateway().map(VyosClient::new)
    }

    pub fn interfaces_key() -> CacheKey {
        CacheKey::new(Backend::Vyos, paths::INTERFACES)
    }

    pub fn vlans_key() -> CacheKey {
        CacheKey::new(Backend::Vyos, paths::VLANS)
    }

    pub fn vrfs_key() -> CacheKey {
        CacheKey::new(Backend::Vyos, paths::VRFS)
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    pub async fn interfaces(&self, force_refresh: bool) -> Result<Vec<Interface>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::interfaces_key(), force_refresh)
            .await?;
        convert::interfaces(&raw)
    }

    pub async fn vlans(&self, force_refresh: bool) -> Result<Vec<Vlan>, CoreError> {
        let raw = self.ctx.load(&Self::vlans_key(), force_refresh).await?;
        convert::vlans(&raw)
    }

    pub async fn vrfs(&self, force_refresh: bool) -> Result<Vec<Vrf>, CoreError> {
        let raw = self.ctx.load(&Self::vrfs_key(), force_refresh).await?;
        convert::vrfs(&raw)
    }

    /// A new VLAN also shows up in the interface list, so both are
    /// invalidated.
    pub async fn create_vlan(
        &self,
        parent: &str,
        vlan_id: u16,
        address: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), CoreError> {
        if parent.trim().is_empty() {
            return Err(CoreError::validation("parent interface must not be empty"));
        }
        if !(1..=4094).contains(&vlan_id) {
            return Err(CoreError::validation(format!(
                "VLAN id {vlan_id} is outside 1-4094"
            )));
        }
        let body = VlanBody {
            parent: parent.to_owned(),
            vlan_id,
            address: non_blank(address),
            description: non_blank(description),
        };
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                vlan_key(parent, vlan_id),
                &[Self::vlans_key(), Self::interfaces_key()],
                vyos.create_vlan(&body),
            )
            .await
    }

    pub async fn delete_vlan(&self, parent: &str, vlan_id: u16) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                vlan_key(parent, vlan_id),
                &[Self::vlans_key(), Self::interfaces_key()],
                vyos.delete_vlan(parent, vlan_id),
            )
            .await
    }

    pub async fn create_vrf(
        &self,
        name: &str,
        table: u32,
        description: Option<&str>,
    ) -> Result<(), CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::validation("VRF name must not be empty"));
        }
        // VyOS routing table range for VRFs.
        if !(100..=65535).contains(&table) {
            return Err(CoreError::validation(format!(
                "VRF table {table} is outside 100-65535"
            )));
        }
        let body = VrfBody {
            name: name.to_owned(),
            table,
            description: non_blank(description),
        };
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                vrf_key(name),
                &[Self::vrfs_key()],
                vyos.create_vrf(&body),
            )
            .await
    }

    pub async fn delete_vrf(&self, name: &str) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                vrf_key(name),
                &[Self::vrfs_key()],
                vyos.delete_vrf(name),
            )
            .await
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
