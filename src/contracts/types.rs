//! The normalized schema every runtime client converges on.
//!
//! Raw CLI records differ per runtime and per version; these are the shapes
//! callers actually see. Inspect items additionally keep the raw JSON text so
//! callers can reach fields the normalization does not carry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Label maps are ordered so rendered output is deterministic.
pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerOS {
    Linux,
    Windows,
}

impl ContainerOS {
    /// Interprets the `Os`/`OSType` strings runtimes report.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tcp" => Some(Self::Tcp),
            "udp" => Some(Self::Udp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

/// One published or exposed port. A port that is exposed but not bound has
/// neither host IP nor host port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortBinding {
    pub container_port: u16,
    pub host_ip: Option<String>,
    pub host_port: Option<u16>,
    pub protocol: Option<Protocol>,
}

/// The parsed parts of an image reference. `<none>` placeholders normalize
/// to `None` rather than surviving as literal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageNameInfo {
    /// The reference exactly as the runtime printed it.
    pub original_name: Option<String>,
    /// Repository path without registry, tag, or digest.
    pub image: Option<String>,
    pub registry: Option<String>,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionItem {
    pub client: String,
    pub server: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoItem {
    pub operating_system: Option<String>,
    pub os_type: Option<ContainerOS>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Container,
    Image,
    Network,
    Volume,
    #[serde(untagged)]
    Other(String),
}

impl EventType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "container" => Self::Container,
            "image" => Self::Image,
            "network" => Self::Network,
            "volume" => Self::Volume,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Container => "container",
            Self::Image => "image",
            Self::Network => "network",
            Self::Volume => "volume",
            Self::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventActor {
    pub id: String,
    pub attributes: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventItem {
    pub event_type: EventType,
    pub action: String,
    pub actor: EventActor,
    pub timestamp: DateTime<Utc>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListImagesItem {
    pub id: String,
    pub image: ImageNameInfo,
    pub created_at: DateTime<Utc>,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectImagesItem {
    pub id: String,
    pub image: ImageNameInfo,
    pub repo_digests: Vec<String>,
    /// True when every repo digest (if any) points at a `localhost/`
    /// registry, i.e. the image was never pushed off the host.
    pub is_local_image: bool,
    pub environment_variables: Labels,
    pub ports: Vec<PortBinding>,
    pub volumes: Vec<String>,
    pub labels: Labels,
    pub entrypoint: Vec<String>,
    pub command: Vec<String>,
    pub current_directory: Option<String>,
    pub architecture: Option<String>,
    pub operating_system: Option<ContainerOS>,
    pub created_at: Option<DateTime<Utc>>,
    pub user: Option<String>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListContainersItem {
    pub id: String,
    pub name: String,
    pub labels: Labels,
    pub image: ImageNameInfo,
    pub ports: Vec<PortBinding>,
    pub networks: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Normalized lifecycle state ("running", "exited", "paused", "created",
    /// "unknown").
    pub state: String,
    /// The runtime's free-text status line, when present.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MountType {
    Bind,
    Volume,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectContainersMount {
    pub mount_type: Option<MountType>,
    pub source: Option<String>,
    pub destination: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectContainersNetwork {
    pub name: String,
    pub gateway: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectContainersItem {
    pub id: String,
    pub name: String,
    pub image_id: String,
    pub image: ImageNameInfo,
    pub status: Option<String>,
    pub environment_variables: Labels,
    pub networks: Vec<InspectContainersNetwork>,
    /// Primary IP, bracketless even for IPv6.
    pub ip_address: Option<String>,
    pub operating_system: Option<ContainerOS>,
    pub ports: Vec<PortBinding>,
    pub mounts: Vec<InspectContainersMount>,
    pub labels: Labels,
    pub entrypoint: Vec<String>,
    pub command: Vec<String>,
    pub current_directory: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListVolumeItem {
    pub name: String,
    pub driver: Option<String>,
    pub labels: Labels,
    pub mountpoint: Option<String>,
    pub scope: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectVolumesItem {
    pub name: String,
    pub driver: Option<String>,
    pub mountpoint: Option<String>,
    pub scope: Option<String>,
    pub labels: Labels,
    pub options: BTreeMap<String, String>,
    pub created_at: Option<DateTime<Utc>>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListNetworkItem {
    pub name: String,
    pub id: Option<String>,
    pub driver: Option<String>,
    pub labels: Labels,
    pub scope: Option<String>,
    pub ipv6: Option<bool>,
    pub internal: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkIpamConfig {
    pub subnet: Option<String>,
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectNetworksItem {
    pub name: String,
    pub id: Option<String>,
    pub driver: Option<String>,
    pub labels: Labels,
    pub scope: Option<String>,
    pub ipv6: Option<bool>,
    pub internal: Option<bool>,
    pub attachable: Option<bool>,
    pub ingress: Option<bool>,
    pub ipam_driver: Option<String>,
    pub ipam_config: Vec<NetworkIpamConfig>,
    pub created_at: Option<DateTime<Utc>>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListContextItem {
    pub name: String,
    pub current: bool,
    pub description: Option<String>,
    pub container_endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectContextItem {
    pub name: String,
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListFilesItem {
    pub name: String,
    pub path: String,
    pub file_type: FileType,
    pub size: Option<u64>,
    pub mode: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub ctime: Option<DateTime<Utc>>,
    pub mtime: Option<DateTime<Utc>>,
    pub atime: Option<DateTime<Utc>>,
}

/// Outcome of a prune. `deleted` holds IDs for images/containers and names
/// for volumes/networks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneResult {
    pub deleted: Vec<String>,
    pub space_reclaimed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_known_and_unknown() {
        assert_eq!(EventType::parse("Container"), EventType::Container);
        assert_eq!(
            EventType::parse("task"),
            EventType::Other("task".to_string())
        );
        assert_eq!(EventType::Other("task".to_string()).as_str(), "task");
    }

    #[test]
    fn os_and_protocol_parse_loosely() {
        assert_eq!(ContainerOS::parse(" Linux "), Some(ContainerOS::Linux));
        assert_eq!(ContainerOS::parse("darwin"), None);
        assert_eq!(Protocol::parse("TCP"), Some(Protocol::Tcp));
        assert_eq!(Protocol::parse("sctp"), None);
    }
}
