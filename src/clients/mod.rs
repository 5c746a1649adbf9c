//! Runtime clients.
//!
//! `ContainerClient` carries the Docker-shaped defaults; `DockerClient` uses
//! them as-is, `PodmanClient` overrides where Podman's output diverges, and
//! Finch/nerdctl share one containerd-flavoured implementation through the
//! `NerdctlRuntime` marker. `ComposeClient` fronts the compose CLI for all
//! four runtimes.

pub mod compose;
pub mod container_client;
pub mod docker;
pub mod docker_like;
pub mod finch;
pub mod nerdctl;
pub mod nerdctl_like;
pub mod podman;

pub use compose::ComposeClient;
pub use container_client::{
    ContainerClient, CONTAINER_INSPECT_PROPERTIES, IMAGE_INSPECT_PROPERTIES,
};
pub use docker::DockerClient;
pub use finch::FinchClient;
pub use nerdctl::NerdctlClient;
pub use nerdctl_like::{NerdctlLikeClient, NerdctlRuntime};
pub use podman::PodmanClient;
