// Docker, Kubernetes, Proxmox, and cloud responses.

use serde_json::Value;

use infradeck_api::cloud::InstanceResponse;
use infradeck_api::docker::{ContainerResponse, ImageResponse};
use infradeck_api::kubernetes::{DeploymentResponse, PodResponse};
use infradeck_api::proxmox::{TemplateResponse, VmResponse};

use super::{decode, entries, timestamp, value_to_bool, value_to_u32};
use crate::error::CoreError;
use crate::model::{
    CloudProvider, Container, ContainerState, Deployment, Image, Instance, Pod, Vm, VmTemplate,
};

/// Decode every item of a list response into `T`, then map it.
fn decode_all<R, T>(
    raw: &Value,
    fields: &[&str],
    what: &str,
    map: impl Fn(R) -> Result<T, CoreError>,
) -> Result<Vec<T>, CoreError>
where
    R: serde::de::DeserializeOwned,
{
    entries(raw, fields)?
        .into_iter()
        .map(|(_, item)| map(decode(what, item)?))
        .collect()
}

// ── Docker ─────────────────────────────────────────────────────────

impl From<ContainerResponse> for Container {
    fn from(c: ContainerResponse) -> Self {
        let name = c
            .names
            .first()
            .cloned()
            .or(c.name)
            .map(|n| n.trim_start_matches('/').to_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| c.id.chars().take(12).collect());
        let state = c
            .state
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(ContainerState::Unknown);

        Self {
            name,
            image: c.image,
            state,
            status: c.status,
            created: c.created.as_ref().and_then(timestamp),
            id: c.id,
        }
    }
}

impl From<ImageResponse> for Image {
    fn from(i: ImageResponse) -> Self {
        Self {
            tags: i
                .repo_tags
                .unwrap_or_default()
                .into_iter()
                .filter(|t| t != "<none>:<none>")
                .collect(),
            size: i.size,
            created: i.created.as_ref().and_then(timestamp),
            id: i.id,
        }
    }
}

pub fn containers(raw: &Value) -> Result<Vec<Container>, CoreError> {
    decode_all(raw, &["containers"], "container", |c: ContainerResponse| {
        Ok(c.into())
    })
}

pub fn images(raw: &Value) -> Result<Vec<Image>, CoreError> {
    decode_all(raw, &["images"], "image", |i: ImageResponse| Ok(i.into()))
}

// ── Kubernetes ─────────────────────────────────────────────────────

impl From<PodResponse> for Pod {
    fn from(p: PodResponse) -> Self {
        let ready = p.ready.and_then(|r| match r {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Self {
            name: p.name,
            namespace: p.namespace.unwrap_or_else(|| "default".into()),
            status: p.status.unwrap_or_else(|| "Unknown".into()),
            node: p.node,
            ip: p.ip,
            restarts: p.restarts.unwrap_or(0),
            ready,
            age: p.age,
        }
    }
}

impl From<DeploymentResponse> for Deployment {
    fn from(d: DeploymentResponse) -> Self {
        Self {
            name: d.name,
            namespace: d.namespace.unwrap_or_else(|| "default".into()),
            replicas: d.replicas.unwrap_or(0),
            ready_replicas: d.ready_replicas.unwrap_or(0),
            available_replicas: d.available_replicas.unwrap_or(0),
            image: d.image,
        }
    }
}

pub fn pods(raw: &Value) -> Result<Vec<Pod>, CoreError> {
    decode_all(raw, &["pods", "items"], "pod", |p: PodResponse| Ok(p.into()))
}

pub fn deployments(raw: &Value) -> Result<Vec<Deployment>, CoreError> {
    decode_all(
        raw,
        &["deployments", "items"],
        "deployment",
        |d: DeploymentResponse| Ok(d.into()),
    )
}

// ── Proxmox ────────────────────────────────────────────────────────

fn vmid(v: &Value, what: &str) -> Result<u32, CoreError> {
    value_to_u32(v).ok_or_else(|| CoreError::decode(format!("{what} with invalid vmid {v}")))
}

/// `GET /templates`: `{"templates": [...]}`, a bare array, or `{}` for a
/// cluster without templates.
pub fn vm_templates(raw: &Value) -> Result<Vec<VmTemplate>, CoreError> {
    decode_all(raw, &["templates"], "template", |t: TemplateResponse| {
        let vmid = vmid(&t.vmid, "template")?;
        Ok(VmTemplate {
            vmid,
            name: t.name.unwrap_or_else(|| format!("template-{vmid}")),
            node: t.node,
            description: t.description.unwrap_or_default(),
        })
    })
}

pub fn vms(raw: &Value) -> Result<Vec<Vm>, CoreError> {
    let mut vms = decode_all(raw, &["vms"], "VM", |v: VmResponse| {
        let vmid = vmid(&v.vmid, "VM")?;
        Ok(Vm {
            vmid,
            name: v.name.unwrap_or_else(|| format!("vm-{vmid}")),
            node: v.node,
            status: v.status.unwrap_or_else(|| "unknown".into()),
            cpus: v.maxcpu,
            max_mem: v.maxmem,
            mem: v.mem,
            uptime: v.uptime,
            template: v.template.as_ref().and_then(value_to_bool).unwrap_or(false),
        })
    })?;
    vms.sort_by_key(|v| v.vmid);
    Ok(vms)
}

// ── Cloud ──────────────────────────────────────────────────────────

pub fn instances(raw: &Value, provider: CloudProvider) -> Result<Vec<Instance>, CoreError> {
    decode_all(raw, &["instances", "vms"], "instance", |i: InstanceResponse| {
        Ok(Instance {
            provider,
            name: i.name.unwrap_or_else(|| i.id.clone()),
            id: i.id,
            state: i.state,
            instance_type: i.instance_type,
            region: i.region,
            public_ip: i.public_ip,
            resource_group: i.resource_group,
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn templates_unwrap_envelope_and_accept_empty_object() {
        let t = vm_templates(&json!({ "templates": [
            { "vmid": 9000, "name": "debian-12", "node": "pve1" },
            { "vmid": "9001" }
        ]}))
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].vmid, 9000);
        assert_eq!(t[1].name, "template-9001");

        assert!(vm_templates(&json!({})).unwrap().is_empty());
        assert!(vm_templates(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn containers_strip_engine_name_prefix() {
        let c = containers(&json!([
            { "Id": "0123456789abcdef", "Names": ["/web"], "State": "running", "Created": 1_700_000_000 },
            { "id": "fedcba9876543210ff", "state": "weird" }
        ]))
        .unwrap();
        assert_eq!(c[0].name, "web");
        assert_eq!(c[0].state, ContainerState::Running);
        assert!(c[0].created.is_some());
        assert_eq!(c[1].name, "fedcba987654");
        assert_eq!(c[1].state, ContainerState::Unknown);
    }

    #[test]
    fn images_drop_dangling_tags() {
        let i = images(&json!({ "images": [
            { "Id": "sha256:1", "RepoTags": ["<none>:<none>"] },
            { "id": "sha256:2", "repo_tags": ["redis:7", "redis:latest"] }
        ]}))
        .unwrap();
        assert!(i[0].tags.is_empty());
        assert_eq!(i[1].tags, vec!["redis:7".to_owned(), "redis:latest".to_owned()]);
    }

    #[test]
    fn pods_default_namespace_and_ready_string() {
        let p = pods(&json!({ "items": [
            { "name": "api-1", "status": "Running", "ready": "1/1" },
            { "name": "job-2", "namespace": "batch", "ready": 0 }
        ]}))
        .unwrap();
        assert_eq!(p[0].namespace, "default");
        assert_eq!(p[0].ready.as_deref(), Some("1/1"));
        assert_eq!(p[1].ready.as_deref(), Some("0"));
        assert_eq!(p[1].status, "Unknown");
    }

    #[test]
    fn vms_sorted_and_template_flag() {
        let v = vms(&json!([
            { "vmid": 120, "name": "web", "status": "running" },
            { "vmid": "101", "template": 1 }
        ]))
        .unwrap();
        assert_eq!(v[0].vmid, 101);
        assert!(v[0].template);
        assert!(v[1].is_running());
    }

    #[test]
    fn instances_tag_provider() {
        let i = instances(&json!([{ "InstanceId": "i-1", "State": "stopped" }]), CloudProvider::Aws)
            .unwrap();
        assert_eq!(i[0].provider, CloudProvider::Aws);
        assert_eq!(i[0].name, "i-1");
    }
}
