// infradeck-api: Async REST clients for the infradeck backends

pub mod cloud;
pub mod docker;
pub mod error;
pub mod gateway;
pub mod kubernetes;
pub mod proxmox;
pub mod transport;
pub mod vyos;

pub use cloud::{CloudClient, CloudProvider};
pub use docker::DockerClient;
pub use error::Error;
pub use gateway::{Backend, Gateway};
pub use kubernetes::KubernetesClient;
pub use proxmox::ProxmoxClient;
pub use transport::{TlsMode, TransportConfig};
pub use vyos::VyosClient;
