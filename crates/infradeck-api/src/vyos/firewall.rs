// VyOS firewall endpoints
//
// Policies (named rule sets), their numbered rules, and address groups.
// The router API has no "update rule" call.

use reqwest::Method;
use tracing::debug;

use super::VyosClient;
use super::types::{AddressGroupBody, PolicyCreateBody, PolicyUpdateBody, RuleBody};
use crate::error::Error;

impl VyosClient {
    // ── Policies ─────────────────────────────────────────────────────

    /// `POST /firewall/policies/{name}`
    pub async fn create_policy(&self, body: &PolicyCreateBody) -> Result<(), Error> {
        debug!(policy = %body.name, "creating firewall policy");
        self.gateway
            .send(
                Method::POST,
                &["firewall", "policies", &body.name],
                Some(body),
            )
            .await
    }

    /// `PUT /firewall/policies/{name}`
    pub async fn update_policy(&self, name: &str, body: &PolicyUpdateBody) -> Result<(), Error> {
        self.gateway
            .send(Method::PUT, &["firewall", "policies", name], Some(body))
            .await
    }

    /// `DELETE /firewall/policies/{name}`
    ///
    /// Removes the policy and all of its rules in one call.
    pub async fn delete_policy(&self, name: &str) -> Result<(), Error> {
        debug!(policy = name, "deleting firewall policy");
        self.gateway
            .send_empty(Method::DELETE, &["firewall", "policies", name])
            .await
    }

    /// `PUT /firewall/policies/{name}/enable`
    pub async fn enable_policy(&self, name: &str) -> Result<(), Error> {
        self.gateway
            .send_empty(Method::PUT, &["firewall", "policies", name, "enable"])
            .await
    }

    /// `PUT /firewall/policies/{name}/disable`
    pub async fn disable_policy(&self, name: &str) -> Result<(), Error> {
        self.gateway
            .send_empty(Method::PUT, &["firewall", "policies", name, "disable"])
            .await
    }

    // ── Rules ────────────────────────────────────────────────────────

    /// `POST /firewall/policies/{name}/rules`
    pub async fn add_rule(&self, policy: &str, body: &RuleBody) -> Result<(), Error> {
        debug!(policy, rule_id = body.rule_id, "adding firewall rule");
        self.gateway
            .send(Method::POST, &["firewall", "policies", policy, "rules"], Some(body))
            .await
    }

    /// `DELETE /firewall/policies/{name}/rules/{id}`
    pub async fn delete_rule(&self, policy: &str, rule_id: u32) -> Result<(), Error> {
        debug!(policy, rule_id, "deleting firewall rule");
        let id = rule_id.to_string();
        self.gateway
            .send_empty(Method::DELETE, &["firewall", "policies", policy, "rules", &id])
            .await
    }

    /// `PUT /firewall/policies/{name}/rules/{id}/enable`
    pub async fn enable_rule(&self, policy: &str, rule_id: u32) -> Result<(), Error> {
        let id = rule_id.to_string();
        self.gateway
            .send_empty(
                Method::PUT,
                &["firewall", "policies", policy, "rules", &id, "enable"],
            )
            .await
    }

    /// `PUT /firewall/policies/{name}/rules/{id}/disable`
    pub async fn disable_rule(&self, policy: &str, rule_id: u32) -> Result<(), Error> {
        let id = rule_id.to_string();
        self.gateway
            .send_empty(
                Method::PUT,
                &["firewall", "policies", policy, "rules", &id, "disable"],
            )
            .await
    }

    // ── Address groups ───────────────────────────────────────────────

    /// `POST /firewall/address-groups`
    pub async fn create_address_group(&self, body: &AddressGroupBody) -> Result<(), Error> {
        self.gateway
            .send(Method::POST, &["firewall", "address-groups"], Some(body))
            .await
    }

    /// `PUT /firewall/address-groups/{name}`
    pub async fn update_address_group(
        &self,
        name: &str,
        body: &AddressGroupBody,
    ) -> Result<(), Error> {
        self.gateway
            .send(Method::PUT, &["firewall", "address-groups", name], Some(body))
            .await
    }

    /// `DELETE /firewall/address-groups/{name}`
    ///
    /// Rules may still reference the group; whether that is allowed is
    /// up to the router.
    pub async fn delete_address_group(&self, name: &str) -> Result<(), Error> {
        self.gateway
            .send_empty(Method::DELETE, &["firewall", "address-groups", name])
            .await
    }
}
