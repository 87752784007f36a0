// ── Containers tab (Docker) ──

use infradeck_api::docker::{ContainerAction, paths};
use infradeck_api::{Backend, DockerClient};

use super::TabContext;
use crate::action::{ActionKey, ActionTracker};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Container, Image};
use crate::store::{CacheKey, CachedLoader};

#[derive(Debug, Clone)]
pub struct ContainersTab {
    ctx: TabContext,
}

impl ContainersTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Docker)?,
        })
    }

    fn docker(&self) -> Result<DockerClient, CoreError> {
        self.ctx.gateway().map(DockerClient::new)
    }

    pub fn containers_key() -> CacheKey {
        CacheKey::new(Backend::Docker, paths::CONTAINERS)
    }

    pub fn images_key() -> CacheKey {
        CacheKey::new(Backend::Docker, paths::IMAGES)
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    pub async fn containers(&self, force_refresh: bool) -> Result<Vec<Container>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::containers_key(), force_refresh)
            .await?;
        convert::containers(&raw)
    }

    pub async fn images(&self, force_refresh: bool) -> Result<Vec<Image>, CoreError> {
        let raw = self.ctx.load(&Self::images_key(), force_refresh).await?;
        convert::images(&raw)
    }

    pub async fn start(&self, id: &str) -> Result<(), CoreError> {
        self.act(id, ContainerAction::Start).await
    }

    pub async fn stop(&self, id: &str) -> Result<(), CoreError> {
        self.act(id, ContainerAction::Stop).await
    }

    pub async fn restart(&self, id: &str) -> Result<(), CoreError> {
        self.act(id, ContainerAction::Restart).await
    }

    /// Busy under `"<action>-<id>"`, e.g. `"start-3f2a9c"`.
    pub async fn act(&self, id: &str, action: ContainerAction) -> Result<(), CoreError> {
        let docker = self.docker()?;
        self.ctx
            .mutate(
                ActionKey::new(action, id),
                &[Self::containers_key()],
                docker.container_action(id, action),
            )
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), CoreError> {
        let docker = self.docker()?;
        self.ctx
            .mutate(
                ActionKey::new("remove", id),
                &[Self::containers_key()],
                docker.remove_container(id),
            )
            .await
    }

    /// Raw log text, newest last. Never cached.
    pub async fn logs(&self, id: &str, tail: Option<u32>) -> Result<String, CoreError> {
        let docker = self.docker()?;
        Ok(docker.container_logs(id, tail).await?)
    }
}
