//! Shared behavior for containerd-backed CLIs (Finch, nerdctl).
//!
//! Both runtimes speak the nerdctl dialect: list output is Docker-shaped
//! but looser (sizes as strings, labels as `k=v` text, networks hidden in a
//! label), the event stream is raw containerd topics with no server-side
//! filtering, and `cp` cannot stream tar archives over stdio. The
//! [`NerdctlRuntime`] marker supplies the command name; everything else is
//! implemented once here.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::args::{
    compose_args, escaped, quoted, with_arg, with_flag_arg, with_named_arg, with_verbatim_arg,
    ArgFn, CommandLineArgs,
};
use crate::clients::container_client::{collect_records, ContainerClient};
use crate::clients::docker_like::arg_helpers::{
    quote_single, with_add_host_arg, with_env_arg, with_json_format_arg,
    with_label_filter_args, with_labels_arg, with_mounts_arg, with_ports_arg,
};
use crate::contracts::options::{
    EventStreamOptions, ListContainersOptions, ListImagesOptions, ListNetworksOptions,
    ListVolumesOptions, ReadFileOptions, RunContainerOptions, WriteFileOptions,
};
use crate::contracts::response::{CommandResponse, StreamResponse};
use crate::contracts::types::{
    ContainerOS, EventActor, EventItem, InfoItem, Labels, ListContainersItem, ListImagesItem,
    ListNetworkItem, ListVolumeItem, PortBinding, VersionItem,
};
use crate::error::{Error, Result};
use crate::parse::events::map_containerd_topic;
use crate::parse::image_name::parse_docker_like_image_name;
use crate::parse::json::{parse_json, parse_ndjson};
use crate::parse::kv::parse_label_string;
use crate::parse::ports::parse_docker_raw_port_string;
use crate::clients::docker_like::normalize::size_from_value;
use crate::parse::timestamp::{or_now, parse_any_timestamp, parse_unix_seconds};

/// Identifies one concrete containerd-backed CLI.
pub trait NerdctlRuntime: Send + Sync {
    fn command_name(&self) -> &str;
    fn display_name(&self) -> &str;
}

/// A [`ContainerClient`] over any containerd-backed runtime. `FinchClient`
/// and `NerdctlClient` are aliases of this with their marker plugged in.
#[derive(Debug, Clone, Default)]
pub struct NerdctlLikeClient<R: NerdctlRuntime> {
    runtime: R,
}

impl<R: NerdctlRuntime + Default> NerdctlLikeClient<R> {
    pub fn new() -> Self {
        Self {
            runtime: R::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NerdctlVersionComponent {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Version")]
    version: String,
}

#[derive(Debug, Deserialize)]
struct NerdctlVersionClient {
    #[serde(rename = "Version", default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NerdctlVersionServer {
    #[serde(rename = "Components", default)]
    components: Vec<NerdctlVersionComponent>,
}

#[derive(Debug, Deserialize)]
struct NerdctlVersionRecord {
    #[serde(rename = "Client")]
    client: NerdctlVersionClient,
    #[serde(rename = "Server", default)]
    server: Option<NerdctlVersionServer>,
}

#[derive(Debug, Deserialize)]
struct NerdctlInfoRecord {
    #[serde(rename = "OperatingSystem", default)]
    operating_system: Option<String>,
    #[serde(rename = "OSType", default)]
    os_type: Option<String>,
}

/// Raw containerd event line. `event` is a nested JSON string.
#[derive(Debug, Deserialize)]
struct ContainerdEventRecord {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Topic")]
    topic: String,
    #[serde(rename = "Event", default)]
    event: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContainerdEventPayload {
    #[serde(default)]
    id: Option<String>,
    // snapshot-style events carry a key instead of an id
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NerdctlListImageRecord {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "Repository")]
    repository: String,
    #[serde(rename = "Tag", default)]
    tag: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    created_at: Option<String>,
    #[serde(rename = "Size", default)]
    size: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct NerdctlListContainerRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Names")]
    names: String,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Ports", default)]
    ports: Option<String>,
    #[serde(rename = "Networks", default)]
    networks: Option<String>,
    #[serde(rename = "Labels", default)]
    labels: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    created_at: Option<String>,
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "Status", default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NerdctlListNetworkRecord {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Driver", default)]
    driver: Option<String>,
    #[serde(rename = "Scope", default)]
    scope: Option<String>,
    #[serde(rename = "IPv6", default)]
    ipv6: Option<String>,
    #[serde(rename = "Internal", default)]
    internal: Option<String>,
    #[serde(rename = "Labels", default)]
    labels: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    created_at: Option<String>,
}

/// Volume labels arrive as a map, a `k=v,k2=v2` string, or "".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LabelsField {
    Map(Labels),
    Text(String),
}

impl LabelsField {
    fn into_labels(this: Option<Self>) -> Labels {
        match this {
            None => Labels::new(),
            Some(Self::Map(labels)) => labels,
            Some(Self::Text(text)) => parse_label_string(Some(&text)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NerdctlListVolumeRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Driver", default)]
    driver: Option<String>,
    #[serde(rename = "Labels", default)]
    labels: Option<LabelsField>,
    #[serde(rename = "Mountpoint", default)]
    mountpoint: Option<String>,
    #[serde(rename = "Scope", default)]
    scope: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    created_at: Option<String>,
}

/// `up`/`exited (0)` style status prefixes as nerdctl prints them.
fn normalize_nerdctl_state(value: Option<&str>) -> String {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_ascii_lowercase(),
        _ => return "unknown".to_string(),
    };
    const PREFIXES: &[(&str, &str)] = &[
        ("up", "running"),
        ("exited", "exited"),
        ("created", "created"),
        ("paused", "paused"),
        ("restarting", "restarting"),
        ("removing", "removing"),
        ("dead", "dead"),
        ("running", "running"),
    ];
    for (prefix, state) in PREFIXES {
        if value.starts_with(prefix) {
            return (*state).to_string();
        }
    }
    "unknown".to_string()
}

/// nerdctl stores a container's networks as a JSON array inside the
/// `nerdctl/networks` label when no Networks column is present.
fn networks_from_labels(labels: &Labels) -> Vec<String> {
    labels
        .get("nerdctl/networks")
        .and_then(|json| serde_json::from_str::<Vec<String>>(json).ok())
        .unwrap_or_default()
}

/// nerdctl has no `--expose` or `--publish-all`. When both are requested,
/// `-p <containerPort>` binds each exposed port to a random host port,
/// which is what the Docker combination would have done. Either option
/// alone has no nerdctl equivalent and is dropped.
fn with_exposed_ports_emulation(expose_ports: &[u16], publish_all: bool) -> ArgFn {
    let ports: Vec<String> = if publish_all {
        expose_ports.iter().map(u16::to_string).collect()
    } else {
        Vec::new()
    };
    with_named_arg("-p", ports)
}

fn normalize_nerdctl_image(record: NerdctlListImageRecord) -> Result<ListImagesItem> {
    let tag = record.tag.as_deref().map(str::trim).unwrap_or_default();
    let reference = if tag.is_empty() || tag == "<none>" {
        record.repository.clone()
    } else {
        format!("{}:{tag}", record.repository)
    };
    Ok(ListImagesItem {
        image: parse_docker_like_image_name(Some(&reference))?,
        id: record.id.unwrap_or_default(),
        created_at: or_now(record.created_at.as_deref().and_then(parse_any_timestamp)),
        size: size_from_value(record.size.as_ref()),
    })
}

fn normalize_nerdctl_container(
    record: NerdctlListContainerRecord,
    strict: bool,
) -> Result<ListContainersItem> {
    let mut ports: Vec<PortBinding> = Vec::new();
    for entry in record
        .ports
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        match parse_docker_raw_port_string(entry) {
            Some(port) => ports.push(port),
            None if strict => {
                return Err(Error::parse(format!("unparseable port binding {entry:?}")));
            }
            None => {}
        }
    }
    let labels = parse_label_string(record.labels.as_deref());
    let networks = match record.networks.as_deref() {
        Some(networks) if !networks.is_empty() => networks
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect(),
        _ => networks_from_labels(&labels),
    };
    let created_at = record.created_at.as_deref().and_then(parse_any_timestamp);
    if created_at.is_none() && strict {
        return Err(Error::parse(format!(
            "invalid container creation date {:?}",
            record.created_at
        )));
    }
    Ok(ListContainersItem {
        image: parse_docker_like_image_name(Some(&record.image))?,
        name: record.names.trim().to_string(),
        id: record.id,
        labels,
        created_at: or_now(created_at),
        ports,
        networks,
        state: normalize_nerdctl_state(record.state.as_deref().or(record.status.as_deref())),
        status: record.status,
    })
}

fn string_bool(value: Option<&str>) -> Option<bool> {
    match value?.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Event `--since`/`--until` values: unix seconds, relative offsets
/// ("5m" means five minutes ago, "-30s" thirty seconds from now), or a
/// timestamp.
fn parse_event_boundary(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<i64>() {
        return parse_unix_seconds(seconds);
    }
    if value.len() > 1 {
        let (amount, unit) = value.split_at(value.len() - 1);
        if let Ok(amount) = amount.parse::<i64>() {
            let offset = match unit {
                "s" => Some(Duration::seconds(amount)),
                "m" => Some(Duration::minutes(amount)),
                "h" => Some(Duration::hours(amount)),
                "d" => Some(Duration::days(amount)),
                _ => None,
            };
            if let Some(offset) = offset {
                return Some(Utc::now() - offset);
            }
        }
    }
    parse_any_timestamp(value)
}

impl<R: NerdctlRuntime> ContainerClient for NerdctlLikeClient<R> {
    fn command_name(&self) -> &str {
        self.runtime.command_name()
    }

    fn display_name(&self) -> &str {
        self.runtime.display_name()
    }

    /// nerdctl reports no API version; the client version plus the
    /// containerd component stand in.
    fn version(&self) -> Result<CommandResponse<VersionItem>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.version_args(),
            |output, strict| {
                let record: NerdctlVersionRecord = match parse_json(output) {
                    Ok(record) => record,
                    Err(e) if strict => return Err(e),
                    Err(_) => {
                        return Ok(VersionItem {
                            client: "unknown".to_string(),
                            server: None,
                        })
                    }
                };
                let server = record.server.and_then(|server| {
                    server
                        .components
                        .into_iter()
                        .find(|c| {
                            let name = c.name.to_ascii_lowercase();
                            name == "containerd" || name == "server"
                        })
                        .map(|c| c.version)
                });
                Ok(VersionItem {
                    client: record.client.version.unwrap_or_else(|| "unknown".to_string()),
                    server,
                })
            },
        ))
    }

    fn info(&self) -> Result<CommandResponse<InfoItem>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.info_args(),
            |output, strict| {
                let record: NerdctlInfoRecord = match parse_json(output) {
                    Ok(record) => record,
                    Err(e) if strict => return Err(e),
                    Err(_) => {
                        return Ok(InfoItem {
                            operating_system: None,
                            os_type: Some(ContainerOS::Linux),
                            raw: output.to_string(),
                        })
                    }
                };
                Ok(InfoItem {
                    os_type: record
                        .os_type
                        .as_deref()
                        .and_then(ContainerOS::parse)
                        .or(Some(ContainerOS::Linux)),
                    operating_system: record.operating_system.or(record.os_type),
                    raw: output.to_string(),
                })
            },
        ))
    }

    fn event_stream_args(&self, _options: &EventStreamOptions) -> CommandLineArgs {
        // No server-side filters: containerd events support neither
        // --filter nor --since/--until.
        compose_args([with_arg(escaped("events")), with_json_format_arg()]).build()
    }

    /// The events command emits raw containerd topics and supports no
    /// filters, so type, action, and time filtering happen here on the
    /// parsed lines. Label filters cannot be emulated because containerd
    /// events carry no label data.
    fn event_stream(&self, options: &EventStreamOptions) -> Result<StreamResponse<EventItem>> {
        if !options.labels.is_empty() {
            return Err(Error::NotSupported(format!(
                "label filtering for events is not supported by {}",
                self.display_name()
            )));
        }
        let types = options.types.clone();
        let actions = options.events.clone();
        let since = options.since.as_deref().and_then(parse_event_boundary);
        let until = options.until.as_deref().and_then(parse_event_boundary);
        Ok(StreamResponse::new(
            self.command_name(),
            self.event_stream_args(options),
            move |line, _strict| {
                let record: ContainerdEventRecord = parse_json(line)?;
                let Some((event_type, action)) = map_containerd_topic(&record.topic) else {
                    return Ok(None);
                };
                if !types.is_empty() && !types.contains(&event_type) {
                    return Ok(None);
                }
                if !actions.is_empty() && !actions.contains(&action) {
                    return Ok(None);
                }
                let timestamp = or_now(parse_any_timestamp(&record.timestamp));
                if since.is_some_and(|since| timestamp < since) {
                    return Ok(None);
                }
                if until.is_some_and(|until| timestamp > until) {
                    return Ok(None);
                }
                let payload: ContainerdEventPayload = record
                    .event
                    .as_deref()
                    .and_then(|event| serde_json::from_str(event).ok())
                    .unwrap_or_default();
                let mut attributes = Labels::new();
                if let Some(image) = payload.image {
                    attributes.insert("image".to_string(), image);
                }
                if let Some(name) = payload.name {
                    attributes.insert("name".to_string(), name);
                }
                Ok(Some(EventItem {
                    event_type,
                    action,
                    actor: EventActor {
                        id: payload.id.or(payload.key).unwrap_or_default(),
                        attributes,
                    },
                    timestamp,
                    raw: line.to_string(),
                }))
            },
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
            with_exposed_ports_emulation(&options.expose_ports, options.publish_all_ports),
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

    fn list_images(&self, options: &ListImagesOptions) -> Result<CommandResponse<Vec<ListImagesItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_images_args(options),
            |output, strict| {
                let records: Vec<NerdctlListImageRecord> = parse_ndjson(output, strict)?;
                collect_records(records, strict, normalize_nerdctl_image)
            },
        ))
    }

    fn list_containers(
        &self,
        options: &ListContainersOptions,
    ) -> Result<CommandResponse<Vec<ListContainersItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_containers_args(options),
            |output, strict| {
                let records: Vec<NerdctlListContainerRecord> = parse_ndjson(output, strict)?;
                collect_records(records, strict, |record| {
                    normalize_nerdctl_container(record, strict)
                })
            },
        ))
    }

    fn list_networks_args(&self, options: &ListNetworksOptions) -> CommandLineArgs {
        // no --no-trunc for network ls
        compose_args([
            with_arg([escaped("network"), escaped("ls")]),
            with_label_filter_args(&options.labels),
            with_json_format_arg(),
        ])
        .build()
    }

    fn list_networks(
        &self,
        options: &ListNetworksOptions,
    ) -> Result<CommandResponse<Vec<ListNetworkItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_networks_args(options),
            |output, strict| {
                let records: Vec<NerdctlListNetworkRecord> = parse_ndjson(output, strict)?;
                Ok(records
                    .into_iter()
                    .map(|record| ListNetworkItem {
                        name: record.name,
                        id: record.id,
                        driver: record.driver,
                        scope: record.scope,
                        ipv6: string_bool(record.ipv6.as_deref()),
                        internal: string_bool(record.internal.as_deref()),
                        labels: parse_label_string(record.labels.as_deref()),
                        created_at: record.created_at.as_deref().and_then(parse_any_timestamp),
                    })
                    .collect())
            },
        ))
    }

    fn list_volumes(
        &self,
        options: &ListVolumesOptions,
    ) -> Result<CommandResponse<Vec<ListVolumeItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_volumes_args(options),
            |output, strict| {
                let records: Vec<NerdctlListVolumeRecord> = parse_ndjson(output, strict)?;
                Ok(records
                    .into_iter()
                    .map(|record| ListVolumeItem {
                        name: record.name,
                        driver: record.driver.or_else(|| Some("local".to_string())),
                        labels: LabelsField::into_labels(record.labels),
                        mountpoint: record.mountpoint,
                        scope: record.scope.or_else(|| Some("local".to_string())),
                        created_at: record.created_at.as_deref().and_then(parse_any_timestamp),
                        size: None,
                    })
                    .collect())
            },
        ))
    }

    /// `cp <container>:<path> -` is unsupported, so a shell pipeline copies
    /// into a temp directory and tars it to stdout. Interpolated values are
    /// single-quoted so container names and paths cannot break out.
    fn read_file(&self, options: &ReadFileOptions) -> Result<CommandResponse<String>> {
        if options.operating_system == Some(ContainerOS::Windows) {
            return default_read_file(self, options);
        }
        let container_path = quote_single(&format!("{}:{}", options.container, options.path));
        let command = quote_single(self.command_name());
        let script = format!(
            "TMPDIR=$(mktemp -d) && {command} cp {container_path} \"$TMPDIR/content\" && tar -C \"$TMPDIR\" -cf - content && rm -rf \"$TMPDIR\"",
        );
        let args = compose_args([with_arg(escaped("-c")), with_arg(quoted(script))]).build();
        Ok(CommandResponse::new("/bin/sh", args, |output, _strict| {
            Ok(output.to_string())
        }))
    }

    /// `cp - <container>:<path>` is likewise unsupported; the tar archive is
    /// read from stdin into a temp directory and copied in from there.
    fn write_file(&self, options: &WriteFileOptions) -> Result<CommandResponse<()>> {
        let container_path = quote_single(&format!("{}:{}", options.container, options.path));
        let command = quote_single(self.command_name());
        let script = format!(
            "TMPDIR=$(mktemp -d) && tar -C \"$TMPDIR\" -xf - && {command} cp \"$TMPDIR/.\" {container_path} && rm -rf \"$TMPDIR\"",
        );
        let args = compose_args([with_arg(escaped("-c")), with_arg(quoted(script))]).build();
        Ok(CommandResponse::new("/bin/sh", args, |_, _| Ok(())))
    }
}

/// The trait-default Windows read path, reachable from the specialized
/// `read_file` above without recursing into it.
fn default_read_file<C: ContainerClient + ?Sized>(
    client: &C,
    options: &ReadFileOptions,
) -> Result<CommandResponse<String>> {
    let args = compose_args([
        with_arg([escaped("container"), escaped("exec")]),
        with_arg(escaped(options.container.clone())),
        with_arg([escaped("cmd"), escaped("/C")]),
        with_arg(escaped(format!("type \"{}\"", options.path))),
    ])
    .build();
    Ok(CommandResponse::new(
        client.command_name(),
        args,
        |output, _strict| Ok(output.to_string()),
    ))
}
