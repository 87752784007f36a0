#![allow(clippy::unwrap_used)]
// Firewall policy/rule mutation protocol against a mocked VyOS API.

use serde_json::json;
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infradeck_api::Gateway;
use infradeck_core::tabs::{policy_key, rule_key};
use infradeck_core::{
    Action, Backend, Console, CoreError, Endpoint, FirewallTab, Gateways, PolicyUpdate, RuleId,
    RuleSpec,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FirewallTab) {
    let server = MockServer::start().await;
    let gateways = Gateways::new();
    gateways.insert(
        Backend::Vyos,
        Gateway::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap(),
    );
    let tab = Console::with_gateways(gateways).firewall().unwrap();
    (server, tab)
}

fn id(n: u32) -> RuleId {
    RuleId::new(n).unwrap()
}

fn wan_in(rules: serde_json::Value) -> serde_json::Value {
    json!({ "WAN_IN": { "default-action": "drop", "rule": rules } })
}

async fn mount_ok(server: &MockServer, verb: &str, route: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rules_display_in_numeric_order() {
    let (server, tab) = setup().await;

    Mock::given(method("GET"))
        .and(path("/firewall/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wan_in(json!({
            "30": { "action": "accept" },
            "5": { "action": "drop", "source": { "group": { "address-group": "BAD" } } },
            "100": { "action": "reject", "destination": { "address": "10.0.0.1" } }
        }))))
        .mount(&server)
        .await;

    let policy = tab.policy("WAN_IN", false).await.unwrap().unwrap();
    assert_eq!(policy.default_action, Action::Drop);
    let order: Vec<u32> = policy.ordered_rules().iter().map(|r| r.id.get()).collect();
    assert_eq!(order, vec![5, 30, 100]);
    assert_eq!(
        policy.rule(id(5)).unwrap().source,
        Endpoint::Group("BAD".into())
    );
}

// ── Policies ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_policy_mutation_invalidates_list() {
    let (server, tab) = setup().await;

    Mock::given(method("GET"))
        .and(path("/firewall/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wan_in(json!({}))))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/firewall/policies/WAN_IN/enable"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    tab.policies(false).await.unwrap();
    tab.policies(false).await.unwrap();
    tab.enable_policy("WAN_IN").await.unwrap();
    tab.policies(false).await.unwrap();
}

#[tokio::test]
async fn test_failed_mutation_keeps_cache() {
    let (server, tab) = setup().await;

    Mock::given(method("GET"))
        .and(path("/firewall/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wan_in(json!({}))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/firewall/policies/WAN_IN"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "policy in use" })))
        .mount(&server)
        .await;

    tab.policies(false).await.unwrap();
    let err = tab.delete_policy("WAN_IN").await.unwrap_err();
    assert_eq!(err.to_string(), "policy in use");
    assert!(!tab.is_busy(&policy_key("WAN_IN")));
    tab.policies(false).await.unwrap();
}

#[tokio::test]
async fn test_double_disable_policy_both_succeed() {
    let (server, tab) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/firewall/policies/P/disable"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    tab.disable_policy("P").await.unwrap();
    tab.disable_policy("P").await.unwrap();
}

#[tokio::test]
async fn test_concurrent_same_key_is_rejected_without_request() {
    let (server, tab) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/firewall/policies/P/disable"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;

    let (first, second) = tokio::join!(tab.disable_policy("P"), async {
        assert!(tab.is_busy(&policy_key("P")));
        tab.disable_policy("P").await
    });
    first.unwrap();
    let err = second.unwrap_err();
    assert!(err.is_busy());
    assert!(!tab.is_busy(&policy_key("P")));
}

#[tokio::test]
async fn test_distinct_keys_run_concurrently() {
    let (server, tab) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(50)))
        .expect(2)
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(tab.disable_policy("A"), tab.disable_policy("B"));
    a.unwrap();
    b.unwrap();
}

#[tokio::test]
async fn test_update_policy_sends_only_given_fields() {
    let (server, tab) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/firewall/policies/WAN_IN"))
        .and(body_json(json!({ "description": "edge" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let update = PolicyUpdate {
        description: Some("edge".into()),
        ..PolicyUpdate::default()
    };
    tab.update_policy("WAN_IN", &update).await.unwrap();
    tab.update_policy("WAN_IN", &PolicyUpdate::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_policy_rejects_blank_name_locally() {
    let (server, tab) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = tab.create_policy(" ", Action::Drop, "").await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

// ── Rules ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_rule_sends_group_and_blank_address() {
    let (server, tab) = setup().await;

    Mock::given(method("POST"))
        .and(path("/firewall/policies/WAN_IN/rules"))
        .and(body_json(json!({
            "rule_id": 20,
            "action": "accept",
            "source_address": "",
            "source_group": "TRUSTED",
            "destination_address": "192.0.2.10",
            "destination_group": "",
            "description": "ssh"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RuleSpec {
        action: Action::Accept,
        source: Endpoint::Group("TRUSTED".into()),
        destination: Endpoint::Address("192.0.2.10".into()),
        description: "ssh".into(),
        ..RuleSpec::default()
    };
    tab.add_rule("WAN_IN", id(20), &spec).await.unwrap();
}

#[tokio::test]
async fn test_rule_toggles_use_rule_paths() {
    let (server, tab) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/firewall/policies/WAN_IN/rules/10/disable"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/firewall/policies/WAN_IN/rules/10/enable"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    tab.disable_rule("WAN_IN", id(10)).await.unwrap();
    tab.enable_rule("WAN_IN", id(10)).await.unwrap();
    assert!(!tab.is_busy(&rule_key("WAN_IN", id(10))));
}

#[tokio::test]
async fn test_edit_rule_is_delete_then_add() {
    let (server, tab) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/firewall/policies/WAN_IN/rules/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/firewall/policies/WAN_IN/rules"))
        .and(body_json(json!({
            "rule_id": 7,
            "action": "reject",
            "source_address": "",
            "source_group": "",
            "destination_address": "",
            "destination_group": "",
            "description": ""
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RuleSpec {
        action: Action::Reject,
        ..RuleSpec::default()
    };
    tab.edit_rule("WAN_IN", id(7), &spec).await.unwrap();

    let calls: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect();
    assert_eq!(
        calls,
        [
            "DELETE /firewall/policies/WAN_IN/rules/7",
            "POST /firewall/policies/WAN_IN/rules",
        ]
    );
}

#[tokio::test]
async fn test_edit_rule_loses_rule_when_add_fails() {
    let (server, tab) = setup().await;

    Mock::given(method("GET"))
        .and(path("/firewall/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wan_in(json!({
            "7": { "action": "accept" },
            "10": { "action": "drop" }
        }))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/firewall/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wan_in(json!({
            "10": { "action": "drop" }
        }))))
        .mount(&server)
        .await;
    mount_ok(&server, "DELETE", "/firewall/policies/WAN_IN/rules/7").await;
    Mock::given(method("POST"))
        .and(path("/firewall/policies/WAN_IN/rules"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "commit failed" })))
        .expect(1)
        .mount(&server)
        .await;

    let before = tab.policy("WAN_IN", false).await.unwrap().unwrap();
    assert!(before.rule(id(7)).is_some());

    let err = tab
        .edit_rule("WAN_IN", id(7), &RuleSpec::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "commit failed");
    assert_eq!(err.status(), Some(500));
    assert!(!tab.is_busy(&rule_key("WAN_IN", id(7))));

    // The delete already invalidated the list: this load hits the backend.
    let after = tab.policy("WAN_IN", false).await.unwrap().unwrap();
    assert!(after.rule(id(7)).is_none());
    assert!(after.rule(id(10)).is_some());
}

#[tokio::test]
async fn test_edit_rule_stops_when_delete_fails() {
    let (server, tab) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/firewall/policies/WAN_IN/rules/7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "no such rule" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = tab
        .edit_rule("WAN_IN", id(7), &RuleSpec::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "no such rule");
}

// ── Address groups ──────────────────────────────────────────────────

#[tokio::test]
async fn test_address_groups_round_trip_through_cache() {
    let (server, tab) = setup().await;

    Mock::given(method("GET"))
        .and(path("/firewall/address-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "TRUSTED": { "address": ["10.0.0.0/8", "192.168.0.0/16"] }
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/firewall/address-groups/TRUSTED"))
        .and(body_json(json!({
            "name": "TRUSTED",
            "addresses": ["10.0.0.0/8"],
            "description": ""
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let groups = tab.address_groups(false).await.unwrap();
    assert_eq!(groups[0].name, "TRUSTED");
    assert_eq!(groups[0].addresses.len(), 2);

    tab.update_address_group("TRUSTED", &["10.0.0.0/8".into()], "")
        .await
        .unwrap();
    tab.address_groups(false).await.unwrap();
}

// ── Reconfiguration ─────────────────────────────────────────────────

#[tokio::test]
async fn test_reconfigured_backend_gets_reads_and_writes() {
    let old = MockServer::start().await;
    let new = MockServer::start().await;
    let gateways = Gateways::new();
    gateways.insert(
        Backend::Vyos,
        Gateway::from_reqwest(&old.uri(), reqwest::Client::new()).unwrap(),
    );
    let console = Console::with_gateways(gateways);
    let tab = console.firewall().unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&old)
        .await;
    Mock::given(method("GET"))
        .and(path("/firewall/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wan_in(json!({}))))
        .expect(2)
        .mount(&new)
        .await;
    Mock::given(method("PUT"))
        .and(path("/firewall/policies/WAN_IN/disable"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&new)
        .await;

    console.configure_backend(
        Backend::Vyos,
        Gateway::from_reqwest(&new.uri(), reqwest::Client::new()).unwrap(),
    );
    tab.policies(false).await.unwrap();
    tab.disable_policy("WAN_IN").await.unwrap();
    tab.policies(false).await.unwrap();
}
