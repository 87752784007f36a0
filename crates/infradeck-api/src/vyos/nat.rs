// VyOS NAT endpoints
//
// Source and destination NAT are separate rule tables; every call carries
// the table discriminator in its path.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::VyosClient;
use super::paths;
use super::types::NatRuleBody;
use crate::error::Error;

/// Which NAT table a rule lives in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NatType {
    #[default]
    Source,
    Destination,
}

impl NatType {
    /// Collection path for this table.
    pub fn rules_path(self) -> &'static [&'static str] {
        match self {
            Self::Source => paths::SOURCE_NAT,
            Self::Destination => paths::DESTINATION_NAT,
        }
    }
}

impl VyosClient {
    /// `POST /nat/{type}/rules`
    pub async fn create_nat_rule(&self, nat_type: NatType, body: &NatRuleBody) -> Result<(), Error> {
        debug!(%nat_type, rule_id = body.rule_id, "creating NAT rule");
        self.gateway
            .send(Method::POST, nat_type.rules_path(), Some(body))
            .await
    }

    /// `PUT /nat/{type}/rules/{id}`
    pub async fn update_nat_rule(
        &self,
        nat_type: NatType,
        rule_id: u32,
        body: &NatRuleBody,
    ) -> Result<(), Error> {
        let id = rule_id.to_string();
        self.gateway
            .send(Method::PUT, &["nat", nat_type.as_ref(), "rules", &id], Some(body))
            .await
    }

    /// `DELETE /nat/{type}/rules/{id}`
    pub async fn delete_nat_rule(&self, nat_type: NatType, rule_id: u32) -> Result<(), Error> {
        debug!(%nat_type, rule_id, "deleting NAT rule");
        let id = rule_id.to_string();
        self.gateway
            .send_empty(Method::DELETE, &["nat", nat_type.as_ref(), "rules", &id])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::NatType;

    #[test]
    fn nat_type_paths_are_distinct() {
        assert_eq!(NatType::Source.rules_path(), &["nat", "source", "rules"]);
        assert_eq!(
            NatType::Destination.rules_path(),
            &["nat", "destination", "rules"]
        );
        assert_eq!(NatType::Destination.to_string(), "destination");
    }
}
