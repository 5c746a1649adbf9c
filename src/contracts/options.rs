//! Options structs for every client operation.
//!
//! These are plain data; clients turn them into annotated argument lists.
//! Everything defaults to "off" so call sites only name what they need.
//! `custom_options` fields accept a verbatim, caller-quoted string that is
//! appended as a single weakly-quoted token.

use std::collections::BTreeMap;

use crate::contracts::types::{ContainerOS, EventType, Labels, MountType, PortBinding};

/// Label filters: a key alone matches presence, a key with a value matches
/// equality.
pub type LabelFilters = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, Default)]
pub struct EventStreamOptions {
    pub types: Vec<EventType>,
    /// Action names ("create", "die", ...).
    pub events: Vec<String>,
    pub labels: LabelFilters,
    pub since: Option<String>,
    pub until: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
    pub username: String,
    /// The password travels over stdin, never the command line.
    pub registry: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LogoutOptions {
    pub registry: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildImageOptions {
    /// Build context directory.
    pub path: String,
    /// Dockerfile path, relative to the context.
    pub file: Option<String>,
    pub stage: Option<String>,
    pub tags: Vec<String>,
    pub disable_content_trust: Option<bool>,
    pub labels: Labels,
    /// `--build-arg` entries; a `None` value forwards the variable from the
    /// environment.
    pub args: BTreeMap<String, Option<String>>,
    pub image_id_file: Option<String>,
    pub pull: bool,
    pub custom_options: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListImagesOptions {
    pub all: bool,
    pub dangling: bool,
    pub labels: LabelFilters,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveImagesOptions {
    pub image_refs: Vec<String>,
    pub force: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PruneImagesOptions {
    pub all: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PullImageOptions {
    pub image_ref: String,
    pub all_tags: bool,
    pub disable_content_trust: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct PushImageOptions {
    pub image_ref: String,
}

#[derive(Debug, Clone, Default)]
pub struct TagImageOptions {
    pub from_image_ref: String,
    pub to_image_ref: String,
}

#[derive(Debug, Clone, Default)]
pub struct InspectImagesOptions {
    pub image_refs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RunContainerMount {
    pub mount_type: MountType,
    pub source: String,
    pub destination: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunContainerOptions {
    pub image_ref: String,
    pub name: Option<String>,
    pub detached: bool,
    /// `--rm`.
    pub remove_on_exit: bool,
    /// `-i -t`.
    pub interactive: bool,
    pub labels: Labels,
    pub ports: Vec<PortBinding>,
    pub publish_all_ports: bool,
    pub expose_ports: Vec<u16>,
    pub network: Option<String>,
    pub network_alias: Option<String>,
    /// `--add-host host:ip` pairs.
    pub add_hosts: Vec<(String, String)>,
    pub mounts: Vec<RunContainerMount>,
    pub environment_variables: Labels,
    pub environment_files: Vec<String>,
    pub entrypoint: Option<String>,
    pub custom_options: Option<String>,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExecContainerOptions {
    pub container: String,
    pub interactive: bool,
    pub detached: bool,
    pub environment_variables: Labels,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListContainersOptions {
    pub all: bool,
    pub labels: LabelFilters,
    pub names: Vec<String>,
    pub networks: Vec<String>,
    pub volumes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StopContainersOptions {
    pub containers: Vec<String>,
    /// Seconds to wait before killing.
    pub time: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct StartContainersOptions {
    pub containers: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RestartContainersOptions {
    pub containers: Vec<String>,
    pub time: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveContainersOptions {
    pub containers: Vec<String>,
    pub force: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LogsForContainerOptions {
    pub container: String,
    pub follow: bool,
    pub tail: Option<u32>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub timestamps: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InspectContainersOptions {
    pub containers: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StatsContainersOptions {
    pub all: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CreateVolumeOptions {
    pub name: String,
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListVolumesOptions {
    pub labels: LabelFilters,
    pub dangling: Option<bool>,
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveVolumesOptions {
    pub volumes: Vec<String>,
    pub force: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InspectVolumesOptions {
    pub volumes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateNetworkOptions {
    pub name: String,
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListNetworksOptions {
    pub labels: LabelFilters,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveNetworksOptions {
    pub networks: Vec<String>,
    pub force: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InspectNetworksOptions {
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UseContextOptions {
    pub context: String,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveContextsOptions {
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InspectContextsOptions {
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilesOptions {
    pub container: String,
    pub path: String,
    pub operating_system: Option<ContainerOS>,
}

#[derive(Debug, Clone, Default)]
pub struct ReadFileOptions {
    pub container: String,
    pub path: String,
    pub operating_system: Option<ContainerOS>,
}

#[derive(Debug, Clone, Default)]
pub struct WriteFileOptions {
    pub container: String,
    pub path: String,
    pub operating_system: Option<ContainerOS>,
}

/// Options shared by every compose subcommand: file/env/project selection
/// rendered before the subcommand itself.
#[derive(Debug, Clone, Default)]
pub struct CommonOrchestratorOptions {
    pub files: Vec<String>,
    pub environment_file: Option<String>,
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpOptions {
    pub common: CommonOrchestratorOptions,
    pub detached: bool,
    pub build: bool,
    pub profiles: Vec<String>,
    pub scale: BTreeMap<String, u32>,
    pub wait: bool,
    pub services: Vec<String>,
    pub custom_options: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DownOptions {
    pub common: CommonOrchestratorOptions,
    /// `--rmi all` or `--rmi local`.
    pub remove_images: Option<String>,
    pub remove_volumes: bool,
    pub timeout_seconds: Option<u32>,
    pub custom_options: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub common: CommonOrchestratorOptions,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StopOptions {
    pub common: CommonOrchestratorOptions,
    pub timeout_seconds: Option<u32>,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RestartOptions {
    pub common: CommonOrchestratorOptions,
    pub timeout_seconds: Option<u32>,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LogsOptions {
    pub common: CommonOrchestratorOptions,
    pub follow: bool,
    pub tail: Option<u32>,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigItemType {
    Services,
    Images,
    Profiles,
    Volumes,
}

impl ConfigItemType {
    pub fn as_flag(&self) -> &'static str {
        match self {
            Self::Services => "--services",
            Self::Images => "--images",
            Self::Profiles => "--profiles",
            Self::Volumes => "--volumes",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigOptions {
    pub common: CommonOrchestratorOptions,
    pub config_type: ConfigItemType,
}
