// ── NAT tab ──
//
// Source and destination NAT are two independent collections with their
// own cache keys. The active type only selects which one the tab shows.

use infradeck_api::{Backend, VyosClient};
use tracing::debug;

use super::TabContext;
use crate::action::{ActionKey, ActionTracker};
use crate::convert;
use crate::error::CoreError;
use crate::model::{NatRule, NatType, RuleId};
use crate::requests::NatRuleSpec;
use crate::store::{CacheKey, CachedLoader};

/// Action key for a NAT rule: `"<type>/<rule id>"`.
pub fn nat_rule_key(nat_type: NatType, id: RuleId) -> ActionKey {
    ActionKey::scoped(nat_type, id)
}

#[derive(Debug, Clone)]
pub struct NatTab {
    ctx: TabContext,
    nat_type: NatType,
}

impl NatTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Vyos)?,
            nat_type: NatType::default(),
        })
    }

    fn vyos(&self) -> Result<VyosClient, CoreError> {
        self.ctx.gateway().map(VyosClient::new)
    }

    pub fn rules_key(nat_type: NatType) -> CacheKey {
        CacheKey::new(Backend::Vyos, nat_type.rules_path())
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    pub fn nat_type(&self) -> NatType {
        self.nat_type
    }

    /// Switch the active table. No request is made and nothing is
    /// invalidated; the next [`rules`](Self::rules) reads the other key.
    pub fn set_nat_type(&mut self, nat_type: NatType) {
        debug!(from = %self.nat_type, to = %nat_type, "switching NAT table");
        self.nat_type = nat_type;
    }

    /// Rules of the active table, ascending by id.
    pub async fn rules(&self, force_refresh: bool) -> Result<Vec<NatRule>, CoreError> {
        self.rules_of(self.nat_type, force_refresh).await
    }

    pub async fn rules_of(
        &self,
        nat_type: NatType,
        force_refresh: bool,
    ) -> Result<Vec<NatRule>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::rules_key(nat_type), force_refresh)
            .await?;
        convert::nat_rules(&raw, nat_type)
    }

    /// Id uniqueness within the table is enforced by the backend.
    pub async fn create_rule(
        &self,
        nat_type: NatType,
        id: RuleId,
        spec: &NatRuleSpec,
    ) -> Result<(), CoreError> {
        spec.validate(nat_type)?;
        let body = spec.to_body(nat_type, id);
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                nat_rule_key(nat_type, id),
                &[Self::rules_key(nat_type)],
                vyos.create_nat_rule(nat_type, &body),
            )
            .await
    }

    pub async fn update_rule(
        &self,
        nat_type: NatType,
        id: RuleId,
        spec: &NatRuleSpec,
    ) -> Result<(), CoreError> {
        spec.validate(nat_type)?;
        let body = spec.to_body(nat_type, id);
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                nat_rule_key(nat_type, id),
                &[Self::rules_key(nat_type)],
                vyos.update_nat_rule(nat_type, id.get(), &body),
            )
            .await
    }

    pub async fn delete_rule(&self, nat_type: NatType, id: RuleId) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                nat_rule_key(nat_type, id),
                &[Self::rules_key(nat_type)],
                vyos.delete_nat_rule(nat_type, id.get()),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_have_distinct_cache_keys() {
        assert_ne!(
            NatTab::rules_key(NatType::Source),
            NatTab::rules_key(NatType::Destination)
        );
        assert_eq!(
            NatTab::rules_key(NatType::Destination).to_string(),
            "vyos:/nat/destination/rules"
        );
    }
}
