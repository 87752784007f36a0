// ── Virtual machines tab (Proxmox) ──

use infradeck_api::proxmox::{VmAction, paths};
use infradeck_api::{Backend, ProxmoxClient};
use tracing::debug;

use super::TabContext;
use crate::action::{ActionKey, ActionTracker};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Vm, VmTemplate};
use crate::requests::CloneVmRequest;
use crate::store::{CacheKey, CachedLoader};

#[derive(Debug, Clone)]
pub struct VmsTab {
    ctx: TabContext,
}

impl VmsTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Proxmox)?,
        })
    }

    fn proxmox(&self) -> Result<ProxmoxClient, CoreError> {
        self.ctx.gateway().map(ProxmoxClient::new)
    }

    pub fn templates_key() -> CacheKey {
        CacheKey::new(Backend::Proxmox, paths::TEMPLATES)
    }

    pub fn vms_key() -> CacheKey {
        CacheKey::new(Backend::Proxmox, paths::VMS)
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    /// Clone sources. Accepts `{"templates": [...]}` or a bare array;
    /// `{}` means no templates.
    pub async fn fetch_templates(&self, force_refresh: bool) -> Result<Vec<VmTemplate>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::templates_key(), force_refresh)
            .await?;
        convert::vm_templates(&raw)
    }

    /// VMs ascending by id.
    pub async fn vms(&self, force_refresh: bool) -> Result<Vec<Vm>, CoreError> {
        let raw = self.ctx.load(&Self::vms_key(), force_refresh).await?;
        convert::vms(&raw)
    }

    pub async fn start(&self, vmid: u32) -> Result<(), CoreError> {
        self.power(vmid, VmAction::Start).await
    }

    pub async fn stop(&self, vmid: u32) -> Result<(), CoreError> {
        self.power(vmid, VmAction::Stop).await
    }

    pub async fn shutdown(&self, vmid: u32) -> Result<(), CoreError> {
        self.power(vmid, VmAction::Shutdown).await
    }

    pub async fn reboot(&self, vmid: u32) -> Result<(), CoreError> {
        self.power(vmid, VmAction::Reboot).await
    }

    /// Busy under `"<action>-<vmid>"`.
    pub async fn power(&self, vmid: u32, action: VmAction) -> Result<(), CoreError> {
        let proxmox = self.proxmox()?;
        self.ctx
            .mutate(
                ActionKey::new(action, vmid),
                &[Self::vms_key()],
                proxmox.vm_action(vmid, action),
            )
            .await
    }

    pub async fn delete(&self, vmid: u32) -> Result<(), CoreError> {
        let proxmox = self.proxmox()?;
        self.ctx
            .mutate(
                ActionKey::new("delete", vmid),
                &[Self::vms_key()],
                proxmox.delete_vm(vmid),
            )
            .await
    }

    /// Clone a template into a new VM. A linked clone never sends
    /// `storage`; a full clone sends it only when one is named.
    pub async fn clone_vm(&self, request: &CloneVmRequest) -> Result<(), CoreError> {
        request.validate()?;
        let body = request.to_body();
        debug!(
            source = request.source_vmid,
            newid = request.new_vmid,
            full = request.full,
            "cloning VM"
        );
        let proxmox = self.proxmox()?;
        self.ctx
            .mutate(
                ActionKey::new("clone", request.source_vmid),
                &[Self::vms_key()],
                proxmox.clone_vm(&body),
            )
            .await
    }
}
