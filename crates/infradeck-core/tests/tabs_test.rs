#![allow(clippy::unwrap_used)]
// Resource tabs end to end: loader reads, guarded mutations, invalidation.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infradeck_api::Gateway;
use infradeck_core::tabs::workload_key;
use infradeck_core::{
    ActionKey, Backend, CloneVmRequest, CloudProvider, Console, ContainerState, CoreError,
    Gateways, NatRuleSpec, NatType, RuleId, Translation,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Every backend served by one mock server.
async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let gateways = Gateways::new();
    for backend in [
        Backend::Proxmox,
        Backend::Docker,
        Backend::Kubernetes,
        Backend::Vyos,
        Backend::Cloud,
    ] {
        gateways.insert(
            backend,
            Gateway::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap(),
        );
    }
    (server, Console::with_gateways(gateways))
}

// ── Virtual machines ────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_templates_resolves_envelope() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "templates": [{ "vmid": 100, "name": "debian-12", "node": "pve1" }]
        })))
        .mount(&server)
        .await;

    let templates = console.vms().unwrap().fetch_templates(false).await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].vmid, 100);
    assert_eq!(templates[0].name, "debian-12");
}

#[tokio::test]
async fn test_fetch_templates_empty_object() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let templates = console.vms().unwrap().fetch_templates(false).await.unwrap();
    assert!(templates.is_empty());
}

#[tokio::test]
async fn test_fetch_templates_accepts_string_vmid() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "templates": [{ "vmid": "9001", "name": "ubuntu-24.04", "node": "pve2" }]
        })))
        .mount(&server)
        .await;

    let templates = console.vms().unwrap().fetch_templates(false).await.unwrap();
    assert_eq!(templates[0].vmid, 9001);
}

#[tokio::test]
async fn test_fetch_templates_scalar_envelope_is_decode_error() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "templates": 3 })))
        .mount(&server)
        .await;

    let err = console
        .vms()
        .unwrap()
        .fetch_templates(false)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_fetch_templates_backend_error_message() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Cluster down" })))
        .mount(&server)
        .await;

    let err = console
        .vms()
        .unwrap()
        .fetch_templates(false)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Backend { status: 500, .. }));
    assert_eq!(err.to_string(), "Cluster down");
}

#[tokio::test]
async fn test_linked_clone_omits_storage() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .and(path("/vms/clone"))
        .and(body_json(json!({
            "vmid": 100,
            "newid": 120,
            "name": "web-01",
            "full": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task": "UPID:pve1" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CloneVmRequest {
        source_vmid: 100,
        new_vmid: 120,
        name: "web-01".into(),
        target_node: None,
        full: false,
        storage: Some("local-lvm".into()),
    };
    console.vms().unwrap().clone_vm(&request).await.unwrap();
}

#[tokio::test]
async fn test_vm_power_action_invalidates_vm_list() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/vms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vms": [
            { "vmid": 120, "name": "web-01", "status": "stopped" }
        ]})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vms/120/start"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let vms = console.vms().unwrap();
    assert_eq!(vms.vms(false).await.unwrap()[0].status, "stopped");
    vms.start(120).await.unwrap();
    assert!(!vms.actions().is_busy(&ActionKey::new("start", 120)));
    vms.vms(false).await.unwrap();
}

// ── NAT ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_nat_tables_load_independently() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/nat/source/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "100": { "outbound-interface": { "name": "eth0" }, "translation": { "address": "masquerade" } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nat/destination/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "rule_id": 10, "inbound_interface": "eth0", "destination_port": "443",
              "translation_address": "10.0.0.5" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut nat = console.nat().unwrap();
    assert_eq!(nat.nat_type(), NatType::Source);
    let source = nat.rules(false).await.unwrap();
    assert_eq!(source[0].interface.as_deref(), Some("eth0"));
    assert_eq!(source[0].translation, Some(Translation::Masquerade));

    nat.set_nat_type(NatType::Destination);
    let destination = nat.rules(false).await.unwrap();
    assert_eq!(
        destination[0].translation,
        Some(Translation::Address("10.0.0.5".into()))
    );

    nat.set_nat_type(NatType::Source);
    nat.rules(false).await.unwrap();
}

#[tokio::test]
async fn test_nat_masquerade_rejected_for_destination() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let spec = NatRuleSpec {
        translation: Some(Translation::Masquerade),
        ..NatRuleSpec::default()
    };
    let err = console
        .nat()
        .unwrap()
        .create_rule(NatType::Destination, RuleId::new(10).unwrap(), &spec)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn test_nat_update_puts_to_rule_path() {
    let (server, console) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/nat/source/rules/100"))
        .and(body_json(json!({
            "rule_id": 100,
            "outbound_interface": "eth0",
            "translation_address": "masquerade"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let spec = NatRuleSpec {
        interface: Some("eth0".into()),
        translation: Some(Translation::Masquerade),
        ..NatRuleSpec::default()
    };
    console
        .nat()
        .unwrap()
        .update_rule(NatType::Source, RuleId::new(100).unwrap(), &spec)
        .await
        .unwrap();
}

// ── Containers ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_container_list_and_restart() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/containers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Id": "3f2a9c01b2c3d4e5", "Names": ["/web"], "Image": "nginx:1.27", "State": "running" }
        ])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/containers/3f2a9c01b2c3d4e5/restart"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tab = console.containers().unwrap();
    let containers = tab.containers(false).await.unwrap();
    assert_eq!(containers[0].name, "web");
    assert_eq!(containers[0].state, ContainerState::Running);

    tab.restart("3f2a9c01b2c3d4e5").await.unwrap();
    tab.containers(false).await.unwrap();
}

#[tokio::test]
async fn test_container_logs_are_raw_text() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/containers/abc/logs"))
        .and(query_param("tail", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string("line 1\nline 2\n"))
        .expect(2)
        .mount(&server)
        .await;

    let tab = console.containers().unwrap();
    assert_eq!(tab.logs("abc", Some(50)).await.unwrap(), "line 1\nline 2\n");
    tab.logs("abc", Some(50)).await.unwrap();
    assert!(console.cache().is_empty());
}

#[tokio::test]
async fn test_images_normalize_tag_field() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Id": "sha256:a", "RepoTags": ["nginx:1.27"], "Size": 1024 },
            { "id": "sha256:b", "repo_tags": ["redis:7"] }
        ])))
        .mount(&server)
        .await;

    let images = console.containers().unwrap().images(false).await.unwrap();
    assert_eq!(images[0].tags, vec!["nginx:1.27".to_owned()]);
    assert_eq!(images[1].tags, vec!["redis:7".to_owned()]);
}

// ── Kubernetes ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_pod_delete_invalidates_both_views() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/pods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [
            { "name": "api-1", "namespace": "prod", "status": "Running" }
        ]})))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/pods/prod/api-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let pods = console.pods().unwrap();
    pods.pods(None, false).await.unwrap();
    pods.pods(Some("prod"), false).await.unwrap();
    pods.delete("prod", "api-1").await.unwrap();
    assert!(!pods.actions().is_busy(&workload_key("prod", "api-1")));
    pods.pods(None, false).await.unwrap();
    pods.pods(Some("prod"), false).await.unwrap();
}

#[tokio::test]
async fn test_scale_deployment_sends_replicas() {
    let (server, console) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/deployments/prod/api/scale"))
        .and(body_json(json!({ "replicas": 3 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    console
        .deployments()
        .unwrap()
        .scale("prod", "api", 3)
        .await
        .unwrap();
}

// ── Interfaces ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_vlan_create_validates_and_posts() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .and(path("/interfaces/vlans"))
        .and(body_json(json!({ "parent": "eth1", "vlan_id": 30, "address": "10.30.0.1/24" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let tab = console.interfaces().unwrap();
    tab.create_vlan("eth1", 30, Some("10.30.0.1/24"), Some(" "))
        .await
        .unwrap();
    let err = tab.create_vlan("eth1", 4095, None, None).await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

// ── Cloud ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_all_instances_merges_providers() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/azure/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vms": [
            { "vm_id": "vm-1", "name": "web", "power_state": "running", "location": "westeurope" }
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aws/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "InstanceId": "i-0abc", "State": "stopped" }
        ])))
        .mount(&server)
        .await;

    let instances = console.cloud().unwrap().all_instances(false).await.unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].provider, CloudProvider::Azure);
    assert_eq!(instances[0].region.as_deref(), Some("westeurope"));
    assert_eq!(instances[1].id, "i-0abc");
}

#[tokio::test]
async fn test_cloud_stop_uses_provider_path() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .and(path("/aws/instances/i-0abc/stop"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    console
        .cloud()
        .unwrap()
        .stop(CloudProvider::Aws, "i-0abc")
        .await
        .unwrap();
}
