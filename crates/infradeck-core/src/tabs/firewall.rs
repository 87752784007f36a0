// ── Firewall tab ──
//
// Policies, their rules, and address groups. All three live under the VyOS
// backend; rule mutations invalidate the policy list because rules are
// delivered inside their policy.

use infradeck_api::vyos::paths;
use infradeck_api::vyos::types::{AddressGroupBody, PolicyCreateBody};
use infradeck_api::{Backend, VyosClient};
use tracing::{debug, warn};

use super::TabContext;
use crate::action::{ActionKey, ActionTracker};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Action, AddressGroup, FirewallPolicy, RuleId};
use crate::requests::{PolicyUpdate, RuleSpec, validate_group_name, validate_policy_name};
use crate::store::{CacheKey, CachedLoader};

/// Action key for policy-level mutations: `"policy-<name>"`.
pub fn policy_key(name: &str) -> ActionKey {
    ActionKey::new("policy", name)
}

/// Action key for rule-level mutations: `"<policy>/<rule id>"`.
pub fn rule_key(policy: &str, id: RuleId) -> ActionKey {
    ActionKey::scoped(policy, id)
}

pub fn group_key(name: &str) -> ActionKey {
    ActionKey::new("group", name)
}

#[derive(Debug, Clone)]
pub struct FirewallTab {
    ctx: TabContext,
}

impl FirewallTab {
    pub(crate) fn new(loader: CachedLoader) -> Result<Self, CoreError> {
        Ok(Self {
            ctx: TabContext::new(loader, Backend::Vyos)?,
        })
    }

    fn vyos(&self) -> Result<VyosClient, CoreError> {
        self.ctx.gateway().map(VyosClient::new)
    }

    pub fn policies_key() -> CacheKey {
        CacheKey::new(Backend::Vyos, paths::FIREWALL_POLICIES)
    }

    pub fn address_groups_key() -> CacheKey {
        CacheKey::new(Backend::Vyos, paths::ADDRESS_GROUPS)
    }

    pub fn actions(&self) -> &ActionTracker {
        self.ctx.actions()
    }

    pub fn is_busy(&self, key: &ActionKey) -> bool {
        self.ctx.actions().is_busy(key)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Policies sorted by name. Rules inside each policy are unordered;
    /// use [`FirewallPolicy::ordered_rules`] for display.
    pub async fn policies(&self, force_refresh: bool) -> Result<Vec<FirewallPolicy>, CoreError> {
        let raw = self.ctx.load(&Self::policies_key(), force_refresh).await?;
        let mut policies = convert::firewall_policies(&raw)?;
        policies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(policies)
    }

    pub async fn policy(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<Option<FirewallPolicy>, CoreError> {
        Ok(self
            .policies(force_refresh)
            .await?
            .into_iter()
            .find(|p| p.name == name))
    }

    pub async fn address_groups(&self, force_refresh: bool) -> Result<Vec<AddressGroup>, CoreError> {
        let raw = self
            .ctx
            .load(&Self::address_groups_key(), force_refresh)
            .await?;
        convert::address_groups(&raw)
    }

    // ── Policies ─────────────────────────────────────────────────────

    /// Name uniqueness is left to the backend.
    pub async fn create_policy(
        &self,
        name: &str,
        default_action: Action,
        description: &str,
    ) -> Result<(), CoreError> {
        validate_policy_name(name)?;
        let body = PolicyCreateBody {
            name: name.to_owned(),
            default_action: default_action.to_string(),
            description: description.to_owned(),
        };
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                policy_key(name),
                &[Self::policies_key()],
                vyos.create_policy(&body),
            )
            .await
    }

    /// Send only the fields present in `update`. An empty update is a
    /// no-op and makes no call.
    pub async fn update_policy(&self, name: &str, update: &PolicyUpdate) -> Result<(), CoreError> {
        if update.is_empty() {
            debug!(policy = name, "empty policy update, skipping");
            return Ok(());
        }
        let body = update.to_body();
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                policy_key(name),
                &[Self::policies_key()],
                vyos.update_policy(name, &body),
            )
            .await
    }

    /// The backend removes the policy's rules with it.
    pub async fn delete_policy(&self, name: &str) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                policy_key(name),
                &[Self::policies_key()],
                vyos.delete_policy(name),
            )
            .await
    }

    pub async fn enable_policy(&self, name: &str) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                policy_key(name),
                &[Self::policies_key()],
                vyos.enable_policy(name),
            )
            .await
    }

    pub async fn disable_policy(&self, name: &str) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                policy_key(name),
                &[Self::policies_key()],
                vyos.disable_policy(name),
            )
            .await
    }

    // ── Rules ────────────────────────────────────────────────────────

    /// Id uniqueness within the policy is enforced by the backend.
    pub async fn add_rule(&self, policy: &str, id: RuleId, spec: &RuleSpec) -> Result<(), CoreError> {
        spec.validate()?;
        let body = spec.to_body(id);
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                rule_key(policy, id),
                &[Self::policies_key()],
                vyos.add_rule(policy, &body),
            )
            .await
    }

    pub async fn delete_rule(&self, policy: &str, id: RuleId) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                rule_key(policy, id),
                &[Self::policies_key()],
                vyos.delete_rule(policy, id.get()),
            )
            .await
    }

    /// Replace a rule: delete it, then add it back with `spec`.
    ///
    /// Not atomic. If the delete succeeds and the add fails, the rule is
    /// gone on the router; the add's error is returned and nothing is
    /// rolled back. The policy list is invalidated as soon as the delete
    /// lands, so the next load shows the router's actual state.
    pub async fn edit_rule(&self, policy: &str, id: RuleId, spec: &RuleSpec) -> Result<(), CoreError> {
        spec.validate()?;
        let body = spec.to_body(id);
        let _guard = self.ctx.actions().begin(rule_key(policy, id))?;

        let vyos = self.vyos()?;
        vyos.delete_rule(policy, id.get()).await?;
        self.ctx.invalidate(&Self::policies_key());

        if let Err(err) = vyos.add_rule(policy, &body).await {
            warn!(
                policy,
                rule_id = id.get(),
                error = %err,
                "rule deleted but re-add failed; rule is lost"
            );
            return Err(err.into());
        }
        self.ctx.invalidate(&Self::policies_key());
        Ok(())
    }

    pub async fn enable_rule(&self, policy: &str, id: RuleId) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                rule_key(policy, id),
                &[Self::policies_key()],
                vyos.enable_rule(policy, id.get()),
            )
            .await
    }

    pub async fn disable_rule(&self, policy: &str, id: RuleId) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                rule_key(policy, id),
                &[Self::policies_key()],
                vyos.disable_rule(policy, id.get()),
            )
            .await
    }

    // ── Address groups ───────────────────────────────────────────────

    /// Rules referencing a group are not checked client-side.
    pub async fn create_address_group(
        &self,
        name: &str,
        addresses: &[String],
        description: &str,
    ) -> Result<(), CoreError> {
        validate_group_name(name)?;
        let body = group_body(name, addresses, description);
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                group_key(name),
                &[Self::address_groups_key()],
                vyos.create_address_group(&body),
            )
            .await
    }

    /// Replace the group's address list and description.
    pub async fn update_address_group(
        &self,
        name: &str,
        addresses: &[String],
        description: &str,
    ) -> Result<(), CoreError> {
        let body = group_body(name, addresses, description);
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                group_key(name),
                &[Self::address_groups_key()],
                vyos.update_address_group(name, &body),
            )
            .await
    }

    pub async fn delete_address_group(&self, name: &str) -> Result<(), CoreError> {
        let vyos = self.vyos()?;
        self.ctx
            .mutate(
                group_key(name),
                &[Self::address_groups_key()],
                vyos.delete_address_group(name),
            )
            .await
    }
}

fn group_body(name: &str, addresses: &[String], description: &str) -> AddressGroupBody {
    AddressGroupBody {
        name: name.to_owned(),
        addresses: addresses
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_owned)
            .collect(),
        description: description.to_owned(),
    }
}
