//! End-to-end command-shape checks across the runtime clients.
//!
//! Every assertion here is on the descriptor only; nothing spawns a process,
//! so these run without any container runtime installed.

use std::collections::BTreeMap;

use container_client::args::{ArgQuoting, CommandLineArgs};
use container_client::clients::{
    ComposeClient, ContainerClient, DockerClient, FinchClient, NerdctlClient, PodmanClient,
};
use container_client::contracts::options::{
    BuildImageOptions, CommonOrchestratorOptions, EventStreamOptions, ListContainersOptions,
    ListFilesOptions, ListImagesOptions, RunContainerMount, RunContainerOptions, UpOptions,
};
use container_client::contracts::types::{EventType, MountType, PortBinding, Protocol};

fn values(args: &CommandLineArgs) -> Vec<&str> {
    args.iter().map(|a| a.value.as_str()).collect()
}

#[test]
fn run_container_full_argument_order() {
    let mut env = BTreeMap::new();
    env.insert("MODE".to_string(), "fast".to_string());
    let options = RunContainerOptions {
        image_ref: "alpine:3.20".to_string(),
        name: Some("worker".to_string()),
        detached: true,
        remove_on_exit: true,
        ports: vec![PortBinding {
            container_port: 80,
            host_ip: None,
            host_port: Some(8080),
            protocol: Some(Protocol::Tcp),
        }],
        network: Some("backend".to_string()),
        mounts: vec![RunContainerMount {
            mount_type: MountType::Bind,
            source: "/data".to_string(),
            destination: "/srv".to_string(),
            read_only: true,
        }],
        environment_variables: env,
        command: vec!["sleep".to_string(), "30".to_string()],
        ..Default::default()
    };
    let response = DockerClient.run_container(&options).unwrap();
    assert_eq!(response.command, "docker");
    assert_eq!(
        values(&response.args),
        [
            "container",
            "run",
            "--detach",
            "--rm",
            "--name",
            "worker",
            "--publish",
            "8080:80/tcp",
            "--network",
            "backend",
            "--mount",
            "type=bind,source=/data,destination=/srv,readonly",
            "--env",
            "MODE=fast",
            "alpine:3.20",
            "sleep",
            "30",
        ]
    );
}

#[test]
fn untrusted_values_carry_strong_quoting() {
    let options = RunContainerOptions {
        image_ref: "alpine".to_string(),
        name: Some("x; rm -rf /".to_string()),
        ..Default::default()
    };
    let response = DockerClient.run_container(&options).unwrap();
    let name = response
        .args
        .iter()
        .find(|arg| arg.value == "x; rm -rf /")
        .expect("name operand missing");
    assert_eq!(name.quoting, ArgQuoting::Strong);
}

#[test]
fn list_files_single_quotes_the_container_path() {
    let options = ListFilesOptions {
        container: "web".to_string(),
        path: "/srv/it's \"here\" $(pwd)".to_string(),
        operating_system: None,
    };
    let response = DockerClient.list_files(&options).unwrap();
    assert_eq!(
        values(&response.args),
        [
            "container",
            "exec",
            "web",
            "/bin/sh",
            "-c",
            "ls -la '/srv/it'\\''s \"here\" $(pwd)'",
        ]
    );
}

#[test]
fn build_image_shape() {
    let mut args = BTreeMap::new();
    args.insert("VERSION".to_string(), Some("1.2".to_string()));
    args.insert("HTTP_PROXY".to_string(), None);
    let options = BuildImageOptions {
        path: ".".to_string(),
        file: Some("build/Dockerfile".to_string()),
        tags: vec!["registry.example.com/app:1.2".to_string()],
        pull: true,
        args,
        ..Default::default()
    };
    let response = DockerClient.build_image(&options).unwrap();
    assert_eq!(
        values(&response.args),
        [
            "image",
            "build",
            "--pull",
            "--file",
            "build/Dockerfile",
            "--tag",
            "registry.example.com/app:1.2",
            "--build-arg",
            "HTTP_PROXY",
            "--build-arg",
            "VERSION=1.2",
            ".",
        ]
    );
}

#[test]
fn list_commands_share_shape_across_docker_and_podman() {
    let options = ListImagesOptions {
        all: true,
        ..Default::default()
    };
    let docker = DockerClient.list_images(&options).unwrap();
    let podman = PodmanClient.list_images(&options).unwrap();
    assert_eq!(docker.command, "docker");
    assert_eq!(podman.command, "podman");
    assert_eq!(values(&docker.args), values(&podman.args));
}

#[test]
fn nerdctl_runtimes_differ_only_in_command() {
    let options = ListContainersOptions {
        all: true,
        ..Default::default()
    };
    let finch = FinchClient::new().list_containers(&options).unwrap();
    let nerdctl = NerdctlClient::new().list_containers(&options).unwrap();
    assert_eq!(finch.command, "finch");
    assert_eq!(nerdctl.command, "nerdctl");
    assert_eq!(values(&finch.args), values(&nerdctl.args));
}

#[test]
fn event_stream_args_diverge_per_runtime() {
    let options = EventStreamOptions {
        types: vec![EventType::Container],
        ..Default::default()
    };
    let docker = DockerClient.event_stream(&options).unwrap();
    assert!(
        values(&docker.args).contains(&"--filter"),
        "docker filters server-side: {:?}",
        values(&docker.args)
    );
    // containerd's event firehose has no server-side filters
    let finch = FinchClient::new().event_stream(&options).unwrap();
    assert!(
        !values(&finch.args).contains(&"--filter"),
        "finch must filter client-side: {:?}",
        values(&finch.args)
    );
}

#[test]
fn compose_files_precede_the_subcommand() {
    let options = UpOptions {
        common: CommonOrchestratorOptions {
            files: vec!["a.yml".to_string(), "b.yml".to_string()],
            ..Default::default()
        },
        detached: true,
        ..Default::default()
    };
    let response = ComposeClient::docker().up(&options).unwrap();
    let rendered = values(&response.args);
    let up = rendered.iter().position(|a| *a == "up").unwrap();
    let second_file = rendered.iter().position(|a| *a == "b.yml").unwrap();
    assert!(second_file < up, "files must precede up: {rendered:?}");
}
