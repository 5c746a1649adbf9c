//! The runtime client trait.
//!
//! Every operation returns a descriptor, never runs anything: the caller
//! picks a runner (local shell, WSL, a test harness) and feeds the output
//! back through the descriptor's parse function. Default method bodies
//! implement the Docker-compatible command shape; runtime clients override
//! only where their CLI diverges.

use std::path::PathBuf;

use crate::args::{
    compose_args, escaped, go_template, quoted, with_arg, with_flag_arg, with_named_arg,
    with_verbatim_arg, CommandLineArgs,
};
use crate::clients::docker_like::arg_helpers::*;
use crate::clients::docker_like::normalize;
use crate::clients::docker_like::records::*;
use crate::contracts::options::*;
use crate::contracts::response::{CommandResponse, StreamResponse};
use crate::contracts::types::*;
use crate::error::{Error, Result};
use crate::parse::files::{parse_linux_listing, parse_windows_listing};
use crate::parse::go_template::go_template_json_format;
use crate::parse::json::{parse_json, parse_ndjson, parse_with_raw};
use crate::parse::prune::{parse_prune_like_output, BARE_RESOURCE_RE, IMAGE_DELETED_RE};

/// Top-level fields projected by the image inspect format template.
pub const IMAGE_INSPECT_PROPERTIES: &[&str] = &[
    "Id",
    "RepoTags",
    "RepoDigests",
    "Config",
    "Architecture",
    "Os",
    "Created",
];

/// Top-level fields projected by the container inspect format template.
pub const CONTAINER_INSPECT_PROPERTIES: &[&str] = &[
    "Id",
    "Name",
    "Image",
    "Platform",
    "Created",
    "Mounts",
    "State",
    "Config",
    "NetworkSettings",
];

fn parse_id_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub trait ContainerClient {
    /// The program invoked for every operation ("docker", "podman", ...).
    fn command_name(&self) -> &str;
    fn display_name(&self) -> &str;

    /// Resolves the CLI on PATH without running it.
    fn check_install(&self) -> Result<PathBuf> {
        let command = self.command_name();
        which::which(command).map_err(|e| Error::Spawn {
            command: command.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, e),
        })
    }

    fn version_args(&self) -> CommandLineArgs {
        compose_args([with_arg(escaped("version")), with_json_format_arg()]).build()
    }

    fn version(&self) -> Result<CommandResponse<VersionItem>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.version_args(),
            |output, _strict| {
                let record: DockerVersionRecord = parse_json(output)?;
                Ok(normalize::normalize_version(record))
            },
        ))
    }

    fn info_args(&self) -> CommandLineArgs {
        compose_args([with_arg(escaped("info")), with_json_format_arg()]).build()
    }

    fn info(&self) -> Result<CommandResponse<InfoItem>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.info_args(),
            |output, _strict| {
                let record: DockerInfoRecord = parse_json(output)?;
                Ok(normalize::normalize_info(record, output))
            },
        ))
    }

    fn event_stream_args(&self, options: &EventStreamOptions) -> CommandLineArgs {
        let type_filters: Vec<String> = options
            .types
            .iter()
            .map(|t| format!("type={}", t.as_str()))
            .collect();
        let event_filters: Vec<String> = options
            .events
            .iter()
            .map(|action| format!("event={action}"))
            .collect();
        compose_args([
            with_arg(escaped("events")),
            with_named_arg("--filter", type_filters),
            with_named_arg("--filter", event_filters),
            with_label_filter_args(&options.labels),
            with_named_arg("--since", options.since.clone()),
            with_named_arg("--until", options.until.clone()),
            with_json_format_arg(),
        ])
        .build()
    }

    fn event_stream(&self, options: &EventStreamOptions) -> Result<StreamResponse<EventItem>> {
        Ok(StreamResponse::new(
            self.command_name(),
            self.event_stream_args(options),
            |line, _strict| {
                let record: DockerEventRecord = parse_json(line)?;
                Ok(Some(normalize::normalize_event(record, line)))
            },
        ))
    }

    /// The password is piped to stdin via the runner, never on the command
    /// line.
    fn login(&self, options: &LoginOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg(escaped("login")),
            with_named_arg("--username", [options.username.clone()]),
            with_flag_arg("--password-stdin", true),
            with_arg(options.registry.clone()),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn logout(&self, options: &LogoutOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg(escaped("logout")),
            with_arg(options.registry.clone()),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn build_image(&self, options: &BuildImageOptions) -> Result<CommandResponse<()>> {
        let disable_content_trust = options.disable_content_trust.map(|v| v.to_string());
        let build_args: Vec<String> = options
            .args
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("{key}={value}"),
                None => key.clone(),
            })
            .collect();
        let args = compose_args([
            with_arg([escaped("image"), escaped("build")]),
            with_flag_arg("--pull", options.pull),
            with_named_arg("--file", options.file.clone()),
            with_named_arg("--target", options.stage.clone()),
            with_named_arg("--tag", options.tags.clone()),
            with_named_arg("--disable-content-trust", disable_content_trust),
            with_labels_arg(&options.labels),
            with_named_arg("--iidfile", options.image_id_file.clone()),
            with_named_arg("--build-arg", build_args),
            with_verbatim_arg(options.custom_options.clone()),
            with_arg(quoted(options.path.clone())),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn list_images_args(&self, options: &ListImagesOptions) -> CommandLineArgs {
        let dangling = options
            .dangling
            .then(|| "dangling=true".to_string());
        let references: Vec<String> = options
            .references
            .iter()
            .map(|reference| format!("reference={reference}"))
            .collect();
        compose_args([
            with_arg([escaped("image"), escaped("ls")]),
            with_flag_arg("--all", options.all),
            with_named_arg("--filter", dangling),
            with_named_arg("--filter", references),
            with_label_filter_args(&options.labels),
            with_no_trunc_arg(),
            with_json_format_arg(),
        ])
        .build()
    }

    fn list_images(&self, options: &ListImagesOptions) -> Result<CommandResponse<Vec<ListImagesItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_images_args(options),
            |output, strict| {
                let records: Vec<DockerListImageRecord> = parse_ndjson(output, strict)?;
                collect_records(records, strict, normalize::normalize_list_image)
            },
        ))
    }

    fn remove_images(&self, options: &RemoveImagesOptions) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("image"), escaped("rm")]),
            with_flag_arg("--force", options.force),
            with_arg(options.image_refs.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_id_lines(output)),
        ))
    }

    fn prune_images_args(&self, options: &PruneImagesOptions) -> CommandLineArgs {
        compose_args([
            with_arg([escaped("image"), escaped("prune")]),
            with_flag_arg("--all", options.all),
            with_flag_arg("--force", true),
        ])
        .build()
    }

    fn prune_images(&self, options: &PruneImagesOptions) -> Result<CommandResponse<PruneResult>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.prune_images_args(options),
            |output, _strict| Ok(parse_prune_like_output(output, &IMAGE_DELETED_RE)),
        ))
    }

    fn pull_image(&self, options: &PullImageOptions) -> Result<CommandResponse<()>> {
        let disable_content_trust = options.disable_content_trust.map(|v| v.to_string());
        let args = compose_args([
            with_arg([escaped("image"), escaped("pull")]),
            with_flag_arg("--all-tags", options.all_tags),
            with_named_arg("--disable-content-trust", disable_content_trust),
            with_arg(escaped(options.image_ref.clone())),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn push_image(&self, options: &PushImageOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg([escaped("image"), escaped("push")]),
            with_arg(escaped(options.image_ref.clone())),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn tag_image(&self, options: &TagImageOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg([escaped("image"), escaped("tag")]),
            with_arg(escaped(options.from_image_ref.clone())),
            with_arg(escaped(options.to_image_ref.clone())),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn inspect_images_format(&self) -> String {
        go_template_json_format(IMAGE_INSPECT_PROPERTIES, &[])
    }

    fn inspect_images(
        &self,
        options: &InspectImagesOptions,
    ) -> Result<CommandResponse<Vec<InspectImagesItem>>> {
        let args = compose_args([
            with_arg([escaped("image"), escaped("inspect")]),
            with_named_arg("--format", [go_template(self.inspect_images_format())]),
            with_arg(options.image_refs.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, strict| parse_with_raw(output, strict, normalize::normalize_inspect_image),
        ))
    }

    fn run_container_args(&self, options: &RunContainerOptions) -> CommandLineArgs {
        compose_args([
            with_arg([escaped("container"), escaped("run")]),
            with_flag_arg("--detach", options.detached),
            with_flag_arg("--interactive", options.interactive),
            with_flag_arg("--tty", options.interactive),
            with_flag_arg("--rm", options.remove_on_exit),
            with_named_arg("--name", options.name.clone()),
            with_ports_arg(&options.ports),
            with_flag_arg("--publish-all", options.publish_all_ports),
            with_named_arg(
                "--expose",
                options
                    .expose_ports
                    .iter()
                    .map(u16::to_string)
                    .collect::<Vec<_>>(),
            ),
            with_named_arg("--network", options.network.clone()),
            with_named_arg("--network-alias", options.network_alias.clone()),
            with_add_host_arg(&options.add_hosts),
            with_mounts_arg(&options.mounts),
            with_labels_arg(&options.labels),
            with_env_arg(&options.environment_variables),
            with_named_arg("--env-file", options.environment_files.clone()),
            with_named_arg("--entrypoint", options.entrypoint.clone()),
            with_verbatim_arg(options.custom_options.clone()),
            with_arg(escaped(options.image_ref.clone())),
            with_arg(options.command.clone()),
        ])
        .build()
    }

    /// Detached runs yield the new container's ID; attached runs yield the
    /// container's combined output.
    fn run_container(&self, options: &RunContainerOptions) -> Result<CommandResponse<String>> {
        let detached = options.detached;
        Ok(CommandResponse::new(
            self.command_name(),
            self.run_container_args(options),
            move |output, _strict| {
                if detached {
                    Ok(output.lines().next().unwrap_or_default().to_string())
                } else {
                    Ok(output.to_string())
                }
            },
        ))
    }

    fn exec_container(&self, options: &ExecContainerOptions) -> Result<CommandResponse<String>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("exec")]),
            with_flag_arg("--interactive", options.interactive),
            with_flag_arg("--detach", options.detached),
            with_env_arg(&options.environment_variables),
            with_arg(escaped(options.container.clone())),
            with_arg(options.command.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(output.to_string()),
        ))
    }

    fn list_containers_args(&self, options: &ListContainersOptions) -> CommandLineArgs {
        let names: Vec<String> = options
            .names
            .iter()
            .map(|name| format!("name={name}"))
            .collect();
        let networks: Vec<String> = options
            .networks
            .iter()
            .map(|network| format!("network={network}"))
            .collect();
        let volumes: Vec<String> = options
            .volumes
            .iter()
            .map(|volume| format!("volume={volume}"))
            .collect();
        compose_args([
            with_arg([escaped("container"), escaped("ls")]),
            with_flag_arg("--all", options.all),
            with_named_arg("--filter", names),
            with_named_arg("--filter", networks),
            with_named_arg("--filter", volumes),
            with_label_filter_args(&options.labels),
            with_no_trunc_arg(),
            with_json_format_arg(),
        ])
        .build()
    }

    fn list_containers(
        &self,
        options: &ListContainersOptions,
    ) -> Result<CommandResponse<Vec<ListContainersItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_containers_args(options),
            |output, strict| {
                let records: Vec<DockerListContainerRecord> = parse_ndjson(output, strict)?;
                collect_records(records, strict, |record| {
                    normalize::normalize_list_container(record, strict)
                })
            },
        ))
    }

    fn stop_containers(&self, options: &StopContainersOptions) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("stop")]),
            with_named_arg("--time", options.time.map(|t| t.to_string())),
            with_arg(options.containers.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_id_lines(output)),
        ))
    }

    fn start_containers(
        &self,
        options: &StartContainersOptions,
    ) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("start")]),
            with_arg(options.containers.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_id_lines(output)),
        ))
    }

    fn restart_containers(
        &self,
        options: &RestartContainersOptions,
    ) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("restart")]),
            with_named_arg("--time", options.time.map(|t| t.to_string())),
            with_arg(options.containers.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_id_lines(output)),
        ))
    }

    fn remove_containers(
        &self,
        options: &RemoveContainersOptions,
    ) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("rm")]),
            with_flag_arg("--force", options.force),
            with_arg(options.containers.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_id_lines(output)),
        ))
    }

    fn prune_containers_args(&self) -> CommandLineArgs {
        compose_args([
            with_arg([escaped("container"), escaped("prune")]),
            with_flag_arg("--force", true),
        ])
        .build()
    }

    fn prune_containers(&self) -> Result<CommandResponse<PruneResult>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.prune_containers_args(),
            |output, _strict| Ok(parse_prune_like_output(output, &BARE_RESOURCE_RE)),
        ))
    }

    fn logs_for_container(
        &self,
        options: &LogsForContainerOptions,
    ) -> Result<StreamResponse<String>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("logs")]),
            with_flag_arg("--follow", options.follow),
            with_flag_arg("--timestamps", options.timestamps),
            with_named_arg("--tail", options.tail.map(|t| t.to_string())),
            with_named_arg("--since", options.since.clone()),
            with_named_arg("--until", options.until.clone()),
            with_arg(escaped(options.container.clone())),
        ])
        .build();
        Ok(StreamResponse::new(
            self.command_name(),
            args,
            |line, _strict| Ok(Some(line.to_string())),
        ))
    }

    fn inspect_containers_format(&self) -> String {
        go_template_json_format(CONTAINER_INSPECT_PROPERTIES, &[])
    }

    fn inspect_containers(
        &self,
        options: &InspectContainersOptions,
    ) -> Result<CommandResponse<Vec<InspectContainersItem>>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("inspect")]),
            with_named_arg("--format", [go_template(self.inspect_containers_format())]),
            with_arg(options.containers.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, strict| parse_with_raw(output, strict, normalize::normalize_inspect_container),
        ))
    }

    /// One-shot stats snapshot; the table is passed through untouched.
    fn stats_containers(&self, options: &StatsContainersOptions) -> Result<CommandResponse<String>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("stats")]),
            with_flag_arg("--all", options.all),
            with_flag_arg("--no-stream", true),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(output.to_string()),
        ))
    }

    fn create_volume(&self, options: &CreateVolumeOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg([escaped("volume"), escaped("create")]),
            with_named_arg("--driver", options.driver.clone()),
            with_arg(escaped(options.name.clone())),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn list_volumes_args(&self, options: &ListVolumesOptions) -> CommandLineArgs {
        let dangling = options.dangling.map(|value| format!("dangling={value}"));
        let driver = options.driver.as_ref().map(|driver| format!("driver={driver}"));
        compose_args([
            with_arg([escaped("volume"), escaped("ls")]),
            with_named_arg("--filter", dangling),
            with_named_arg("--filter", driver),
            with_label_filter_args(&options.labels),
            with_json_format_arg(),
        ])
        .build()
    }

    fn list_volumes(&self, options: &ListVolumesOptions) -> Result<CommandResponse<Vec<ListVolumeItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_volumes_args(options),
            |output, strict| {
                let records: Vec<DockerListVolumeRecord> = parse_ndjson(output, strict)?;
                Ok(records
                    .into_iter()
                    .map(normalize::normalize_list_volume)
                    .collect())
            },
        ))
    }

    fn remove_volumes(&self, options: &RemoveVolumesOptions) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("volume"), escaped("rm")]),
            with_flag_arg("--force", options.force),
            with_arg(options.volumes.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_id_lines(output)),
        ))
    }

    fn prune_volumes(&self) -> Result<CommandResponse<PruneResult>> {
        let args = compose_args([
            with_arg([escaped("volume"), escaped("prune")]),
            with_flag_arg("--force", true),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_prune_like_output(output, &BARE_RESOURCE_RE)),
        ))
    }

    fn inspect_volumes(
        &self,
        options: &InspectVolumesOptions,
    ) -> Result<CommandResponse<Vec<InspectVolumesItem>>> {
        let args = compose_args([
            with_arg([escaped("volume"), escaped("inspect")]),
            with_arg(options.volumes.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, strict| {
                parse_with_raw(output, strict, |record, raw| {
                    Ok(normalize::normalize_inspect_volume(record, raw))
                })
            },
        ))
    }

    fn create_network(&self, options: &CreateNetworkOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg([escaped("network"), escaped("create")]),
            with_named_arg("--driver", options.driver.clone()),
            with_arg(escaped(options.name.clone())),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn list_networks_args(&self, options: &ListNetworksOptions) -> CommandLineArgs {
        compose_args([
            with_arg([escaped("network"), escaped("ls")]),
            with_label_filter_args(&options.labels),
            with_no_trunc_arg(),
            with_json_format_arg(),
        ])
        .build()
    }

    fn list_networks(&self, options: &ListNetworksOptions) -> Result<CommandResponse<Vec<ListNetworkItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_networks_args(options),
            |output, strict| {
                let records: Vec<DockerListNetworkRecord> = parse_ndjson(output, strict)?;
                Ok(records
                    .into_iter()
                    .map(normalize::normalize_list_network)
                    .collect())
            },
        ))
    }

    fn remove_networks(&self, options: &RemoveNetworksOptions) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("network"), escaped("rm")]),
            with_flag_arg("--force", options.force),
            with_arg(options.networks.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_id_lines(output)),
        ))
    }

    fn prune_networks(&self) -> Result<CommandResponse<PruneResult>> {
        let args = compose_args([
            with_arg([escaped("network"), escaped("prune")]),
            with_flag_arg("--force", true),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(parse_prune_like_output(output, &BARE_RESOURCE_RE)),
        ))
    }

    fn inspect_networks(
        &self,
        options: &InspectNetworksOptions,
    ) -> Result<CommandResponse<Vec<InspectNetworksItem>>> {
        let args = compose_args([
            with_arg([escaped("network"), escaped("inspect")]),
            with_arg(options.networks.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, strict| {
                parse_with_raw(output, strict, |record, raw| {
                    Ok(normalize::normalize_inspect_network(record, raw))
                })
            },
        ))
    }

    fn list_contexts(&self) -> Result<CommandResponse<Vec<ListContextItem>>> {
        Err(Error::NotSupported(format!(
            "contexts are not supported by {}",
            self.display_name()
        )))
    }

    fn use_context(&self, _options: &UseContextOptions) -> Result<CommandResponse<()>> {
        Err(Error::NotSupported(format!(
            "contexts are not supported by {}",
            self.display_name()
        )))
    }

    fn remove_contexts(&self, _options: &RemoveContextsOptions) -> Result<CommandResponse<Vec<String>>> {
        Err(Error::NotSupported(format!(
            "contexts are not supported by {}",
            self.display_name()
        )))
    }

    fn inspect_contexts(
        &self,
        _options: &InspectContextsOptions,
    ) -> Result<CommandResponse<Vec<InspectContextItem>>> {
        Err(Error::NotSupported(format!(
            "contexts are not supported by {}",
            self.display_name()
        )))
    }

    fn list_files(&self, options: &ListFilesOptions) -> Result<CommandResponse<Vec<ListFilesItem>>> {
        let windows = options.operating_system == Some(ContainerOS::Windows);
        let listing: Vec<String> = if windows {
            vec![
                "cmd".into(),
                "/C".into(),
                format!("dir /A-S /-C \"{}\"", options.path),
            ]
        } else {
            vec![
                "/bin/sh".into(),
                "-c".into(),
                format!("ls -la {}", quote_single(&options.path)),
            ]
        };
        let args = compose_args([
            with_arg([escaped("container"), escaped("exec")]),
            with_arg(escaped(options.container.clone())),
            with_arg(listing),
        ])
        .build();
        let base_path = options.path.clone();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            move |output, _strict| {
                Ok(if windows {
                    parse_windows_listing(&base_path, output)
                } else {
                    parse_linux_listing(&base_path, output)
                })
            },
        ))
    }

    /// Linux containers stream a tar archive of the file over stdout;
    /// Windows containers fall back to `cmd /C type`.
    fn read_file(&self, options: &ReadFileOptions) -> Result<CommandResponse<String>> {
        let args = if options.operating_system == Some(ContainerOS::Windows) {
            compose_args([
                with_arg([escaped("container"), escaped("exec")]),
                with_arg(escaped(options.container.clone())),
                with_arg([escaped("cmd"), escaped("/C")]),
                with_arg(escaped(format!("type \"{}\"", options.path))),
            ])
            .build()
        } else {
            compose_args([
                with_arg([escaped("container"), escaped("cp")]),
                with_container_path_arg(&options.container, &options.path),
                with_arg(escaped("-")),
            ])
            .build()
        };
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| Ok(output.to_string()),
        ))
    }

    /// Expects a tar archive on stdin (run through the runner's input
    /// variant) that is extracted at the target path.
    fn write_file(&self, options: &WriteFileOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg([escaped("container"), escaped("cp")]),
            with_arg(escaped("-")),
            with_container_path_arg(&options.container, &options.path),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }
}

/// Applies strict/lenient policy to per-record normalization.
pub(crate) fn collect_records<R, T>(
    records: Vec<R>,
    strict: bool,
    normalize: impl Fn(R) -> Result<T>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for record in records {
        match normalize(record) {
            Ok(item) => items.push(item),
            Err(e) if strict => return Err(e),
            Err(e) => tracing::debug!(error = %e, "dropping malformed record"),
        }
    }
    Ok(items)
}
