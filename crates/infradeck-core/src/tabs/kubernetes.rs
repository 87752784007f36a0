// ── Kubernetes tabs ──
//
// Pods and deployments are separate views with separate trackers. Both
// key their actions by `"<namespace>/<name>"`.

use infradeck_api::kubernetes::paths;
use infradeck_api::{Backend, KubernetesClient};

use super::TabContext;
use crate::action::{ActionKey, ActionTracker};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Deployment, Pod};
use crate::store::{CacheKey, CachedLoader};

pub fn workload_key(namespace: &str, name: &str) -> ActionKey {
    ActionKey::scoped(namespace, name)
}

// ── Pods ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PodsTab {
    ctx: TabContext,
}

impl PodsTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Kubernetes)?,
        })
    }

    fn kube(&self) -> Result<KubernetesClient, CoreError> {
        self.ctx.gateway().map(KubernetesClient::new)
    }

    /// `None` lists every namespace; each namespace filter is its own
    /// cache entry.
    pub fn pods_key(namespace: Option<&str>) -> CacheKey {
        let key = CacheKey::new(Backend::Kubernetes, paths::PODS);
        match namespace {
            Some(ns) => key.with_param("namespace", ns),
            None => key,
        }
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    pub async fn pods(
        &self,
        namespace: Option<&str>,
        force_refresh: bool,
    ) -> Result<Vec<Pod>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::pods_key(namespace), force_refresh)
            .await?;
        convert::pods(&raw)
    }

    /// Invalidates both the all-namespaces list and the pod's namespace.
    pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), CoreError> {
        let kube = self.kube()?;
        self.ctx
            .mutate(
                workload_key(namespace, name),
                &[Self::pods_key(None), Self::pods_key(Some(namespace))],
                kube.delete_pod(namespace, name),
            )
            .await
    }

    pub async fn logs(
        &self,
        namespace: &str,
        name: &str,
        tail: Option<u32>,
    ) -> Result<String, CoreError> {
        let kube = self.kube()?;
        Ok(kube.pod_logs(namespace, name, tail).await?)
    }
}

// ── Deployments ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DeploymentsTab {
    ctx: TabContext,
}

impl DeploymentsTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Kubernetes)?,
        })
    }

    fn kube(&self) -> Result<KubernetesClient, CoreError> {
        self.ctx.gateway().map(KubernetesClient::new)
    }

    pub fn deployments_key() -> CacheKey {
        CacheKey::new(Backend::Kubernetes, paths::DEPLOYMENTS)
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    pub async fn deployments(&self, force_refresh: bool) -> Result<Vec<Deployment>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::deployments_key(), force_refresh)
            .await?;
        convert::deployments(&raw)
    }

    pub async fn scale(&self, namespace: &str, name: &str, replicas: u32) -> Result<(), CoreError> {
        let kube = self.kube()?;
        self.ctx
            .mutate(
                workload_key(namespace, name),
                &[Self::deployments_key()],
                kube.scale_deployment(namespace, name, replicas),
            )
            .await
    }

    /// Rollout restart. Pods are recreated, so the pod lists go stale too.
    pub async fn restart(&self, namespace: &str, name: &str) -> Result<(), CoreError> {
        let kube = self.kube()?;
        self.ctx
            .mutate(
                workload_key(namespace, name),
                &[
                    Self::deployments_key(),
                    PodsTab::pods_key(None),
                    PodsTab::pods_key(Some(namespace)),
                ],
                kube.restart_deployment(namespace, name),
            )
            .await
    }
}
