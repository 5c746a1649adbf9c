//! Raw record shapes for Docker-compatible CLI output.
//!
//! These mirror what the CLI actually prints, PascalCase keys and all, and
//! are deliberately tolerant: fields that drift between runtime versions are
//! optional, and values that may be a string or a number are captured as
//! JSON values and coerced during normalization.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::contracts::types::Labels;
use crate::parse::ports::RawPortHostBinding;

/// `Entrypoint`/`Cmd` appear as a string, an array, or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    pub fn into_vec(this: Option<Self>) -> Vec<String> {
        match this {
            None => Vec::new(),
            Some(Self::One(value)) => vec![value],
            Some(Self::Many(values)) => values,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DockerVersionRecord {
    #[serde(rename = "Client")]
    pub client: DockerVersionComponent,
    #[serde(rename = "Server")]
    pub server: Option<DockerVersionComponent>,
}

#[derive(Debug, Deserialize)]
pub struct DockerVersionComponent {
    #[serde(rename = "ApiVersion")]
    pub api_version: String,
}

#[derive(Debug, Deserialize)]
pub struct DockerInfoRecord {
    #[serde(rename = "OperatingSystem")]
    pub operating_system: Option<String>,
    #[serde(rename = "OSType")]
    pub os_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DockerEventRecord {
    #[serde(rename = "Type")]
    pub event_type: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Actor")]
    pub actor: DockerEventActor,
    pub time: i64,
}

#[derive(Debug, Deserialize)]
pub struct DockerEventActor {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Attributes", default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct DockerListImageRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Repository")]
    pub repository: String,
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    // string ("62.95MB") from the CLI table, number from some runtimes
    #[serde(rename = "Size")]
    pub size: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct DockerListContainerRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Names")]
    pub names: String,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Ports", default)]
    pub ports: Option<String>,
    #[serde(rename = "Networks", default)]
    pub networks: Option<String>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DockerListVolumeRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Driver", default)]
    pub driver: Option<String>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<String>,
    #[serde(rename = "Mountpoint", default)]
    pub mountpoint: Option<String>,
    #[serde(rename = "Scope", default)]
    pub scope: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "Size", default)]
    pub size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DockerListNetworkRecord {
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Driver", default)]
    pub driver: Option<String>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<String>,
    #[serde(rename = "Scope", default)]
    pub scope: Option<String>,
    // booleans rendered as "true"/"false" strings in list output
    #[serde(rename = "IPv6", default)]
    pub ipv6: Option<String>,
    #[serde(rename = "Internal", default)]
    pub internal: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DockerContextRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Current")]
    pub current: bool,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "DockerEndpoint", default)]
    pub docker_endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DockerInspectContextRecord {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DockerInspectImageConfig {
    #[serde(rename = "Entrypoint", default)]
    pub entrypoint: Option<StringOrList>,
    #[serde(rename = "Cmd", default)]
    pub cmd: Option<StringOrList>,
    #[serde(rename = "Env", default)]
    pub env: Option<Vec<String>>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<Labels>,
    #[serde(rename = "ExposedPorts", default)]
    pub exposed_ports: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(rename = "Volumes", default)]
    pub volumes: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(rename = "WorkingDir", default)]
    pub working_dir: Option<String>,
    #[serde(rename = "User", default)]
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DockerInspectImageRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "RepoTags", default)]
    pub repo_tags: Vec<String>,
    #[serde(rename = "Config", default)]
    pub config: Option<DockerInspectImageConfig>,
    #[serde(rename = "RepoDigests", default)]
    pub repo_digests: Vec<String>,
    #[serde(rename = "Architecture", default)]
    pub architecture: Option<String>,
    #[serde(rename = "Os", default)]
    pub os: Option<String>,
    #[serde(rename = "Created", default)]
    pub created: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DockerInspectContainerMount {
    #[serde(rename = "Type", default)]
    pub mount_type: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Source", default)]
    pub source: Option<String>,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "RW", default)]
    pub rw: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DockerInspectContainerNetwork {
    #[serde(rename = "Gateway", default)]
    pub gateway: Option<String>,
    #[serde(rename = "IPAddress", default)]
    pub ip_address: Option<String>,
    #[serde(rename = "MacAddress", default)]
    pub mac_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DockerInspectContainerState {
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "StartedAt", default)]
    pub started_at: Option<String>,
    #[serde(rename = "FinishedAt", default)]
    pub finished_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DockerInspectContainerConfig {
    #[serde(rename = "Image", default)]
    pub image: Option<String>,
    #[serde(rename = "Entrypoint", default)]
    pub entrypoint: Option<StringOrList>,
    #[serde(rename = "Cmd", default)]
    pub cmd: Option<StringOrList>,
    #[serde(rename = "Env", default)]
    pub env: Option<Vec<String>>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<Labels>,
    #[serde(rename = "WorkingDir", default)]
    pub working_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DockerInspectContainerNetworkSettings {
    #[serde(rename = "Networks", default)]
    pub networks: Option<BTreeMap<String, DockerInspectContainerNetwork>>,
    #[serde(rename = "IPAddress", default)]
    pub ip_address: Option<String>,
    #[serde(rename = "Ports", default)]
    pub ports: Option<BTreeMap<String, Option<Vec<RawPortHostBinding>>>>,
}

#[derive(Debug, Deserialize)]
pub struct DockerInspectContainerRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Platform", default)]
    pub platform: Option<String>,
    #[serde(rename = "Created", default)]
    pub created: Option<String>,
    #[serde(rename = "Mounts", default)]
    pub mounts: Vec<DockerInspectContainerMount>,
    #[serde(rename = "State", default)]
    pub state: Option<DockerInspectContainerState>,
    #[serde(rename = "Config", default)]
    pub config: Option<DockerInspectContainerConfig>,
    #[serde(rename = "NetworkSettings", default)]
    pub network_settings: Option<DockerInspectContainerNetworkSettings>,
}

#[derive(Debug, Deserialize)]
pub struct DockerInspectVolumeRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Driver", default)]
    pub driver: Option<String>,
    #[serde(rename = "Mountpoint", default)]
    pub mountpoint: Option<String>,
    #[serde(rename = "Scope", default)]
    pub scope: Option<String>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<Labels>,
    #[serde(rename = "Options", default)]
    pub options: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DockerIpamConfig {
    #[serde(rename = "Subnet", default)]
    pub subnet: Option<String>,
    #[serde(rename = "Gateway", default)]
    pub gateway: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DockerIpam {
    #[serde(rename = "Driver", default)]
    pub driver: Option<String>,
    #[serde(rename = "Config", default)]
    pub config: Option<Vec<DockerIpamConfig>>,
}

#[derive(Debug, Deserialize)]
pub struct DockerInspectNetworkRecord {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Driver", default)]
    pub driver: Option<String>,
    #[serde(rename = "Scope", default)]
    pub scope: Option<String>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<Labels>,
    #[serde(rename = "IPAM", default)]
    pub ipam: Option<DockerIpam>,
    #[serde(rename = "EnableIPv6", default)]
    pub enable_ipv6: Option<bool>,
    #[serde(rename = "Internal", default)]
    pub internal: Option<bool>,
    #[serde(rename = "Attachable", default)]
    pub attachable: Option<bool>,
    #[serde(rename = "Ingress", default)]
    pub ingress: Option<bool>,
    #[serde(rename = "Created", default)]
    pub created: Option<String>,
}
