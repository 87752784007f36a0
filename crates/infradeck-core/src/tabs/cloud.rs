// ── Cloud instances tab ──
//
// Azure and AWS share one backend; each provider is its own collection.

use futures_util::future::try_join;
use infradeck_api::cloud::InstanceAction;
use infradeck_api::{Backend, CloudClient};

use super::TabContext;
use crate::action::{ActionKey, ActionTracker};
use crate::convert;
use crate::error::CoreError;
use crate::model::{CloudProvider, Instance};
use crate::store::{CacheKey, CachedLoader};

#[derive(Debug, Clone)]
pub struct CloudTab {
    ctx: TabContext,
}

impl CloudTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Cloud)?,
        })
    }

    fn cloud(&self) -> Result<CloudClient, CoreError> {
        self.ctx.gateway().map(CloudClient::new)
    }

    pub fn instances_key(provider: CloudProvider) -> CacheKey {
        CacheKey::new(Backend::Cloud, &provider.instances_path())
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    pub async fn instances(
        &self,
        provider: CloudProvider,
        force_refresh: bool,
    ) -> Result<Vec<Instance>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::instances_key(provider), force_refresh)
            .await?;
        convert::instances(&raw, provider)
    }

    /// Both providers, fetched concurrently. Azure first.
    pub async fn all_instances(&self, force_refresh: bool) -> Result<Vec<Instance>, CoreError> {
        let (mut azure, aws) = try_join(
            self.instances(CloudProvider::Azure, force_refresh),
            self.instances(CloudProvider::Aws, force_refresh),
        )
        .await?;
        azure.extend(aws);
        Ok(azure)
    }

    pub async fn start(&self, provider: CloudProvider, id: &str) -> Result<(), CoreError> {
        self.act(provider, id, InstanceAction::Start).await
    }

    pub async fn stop(&self, provider: CloudProvider, id: &str) -> Result<(), CoreError> {
        self.act(provider, id, InstanceAction::Stop).await
    }

    /// Busy under `"<action>-<provider>/<id>"`; ids are only unique per
    /// provider.
    pub async fn act(
        &self,
        provider: CloudProvider,
        id: &str,
        action: InstanceAction,
    ) -> Result<(), CoreError> {
        let cloud = self.cloud()?;
        self.ctx
            .mutate(
                ActionKey::new(action, format!("{provider}/{id}")),
                &[Self::instances_key(provider)],
                cloud.instance_action(provider, id, action),
            )
            .await
    }
}
