//! Podman CLI client.
//!
//! Podman takes the Docker command shapes but answers in its own JSON:
//! list commands return arrays with numeric unix timestamps, events carry
//! `Status`/`Name` instead of `Action`/`Actor`, and `volume ls` returns an
//! array of JSON *strings*. Container inspect output has no `Platform`
//! field, so the format template substitutes a literal.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::clients::container_client::{
    collect_records, ContainerClient, CONTAINER_INSPECT_PROPERTIES,
};
use crate::contracts::options::{
    EventStreamOptions, ListContainersOptions, ListImagesOptions, ListNetworksOptions,
    ListVolumesOptions, PruneImagesOptions,
};
use crate::contracts::response::{CommandResponse, StreamResponse};
use crate::contracts::types::{
    EventActor, EventItem, EventType, InfoItem, Labels, ListContainersItem, ListImagesItem,
    ListNetworkItem, ListVolumeItem, PortBinding, Protocol, PruneResult, VersionItem,
};
use crate::error::Result;
use crate::parse::go_template::go_template_json_format;
use crate::parse::image_name::parse_docker_like_image_name;
use crate::parse::json::{parse_json, parse_json_array};
use crate::parse::state::normalize_container_state;
use crate::parse::timestamp::{or_epoch, or_now, parse_any_timestamp, parse_unix_seconds};

#[derive(Debug, Deserialize)]
struct PodmanVersionComponent {
    #[serde(rename = "APIVersion")]
    api_version: String,
}

#[derive(Debug, Deserialize)]
struct PodmanVersionRecord {
    #[serde(rename = "Client")]
    client: PodmanVersionComponent,
    #[serde(rename = "Server", default)]
    server: Option<PodmanVersionComponent>,
}

#[derive(Debug, Deserialize)]
struct PodmanEventRecord {
    #[serde(rename = "Type")]
    event_type: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Attributes", default)]
    attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PodmanListImageRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Names", default)]
    names: Vec<String>,
    #[serde(rename = "Size")]
    size: u64,
    #[serde(rename = "Created")]
    created: i64,
}

#[derive(Debug, Deserialize)]
struct PodmanPortBinding {
    host_ip: Option<String>,
    container_port: u16,
    host_port: Option<u16>,
    protocol: String,
}

#[derive(Debug, Deserialize)]
struct PodmanListContainerRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Names", default)]
    names: Vec<String>,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Ports", default)]
    ports: Option<Vec<PodmanPortBinding>>,
    #[serde(rename = "Networks", default)]
    networks: Option<Vec<String>>,
    #[serde(rename = "Labels", default)]
    labels: Option<Labels>,
    #[serde(rename = "Created")]
    created: i64,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Status", default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PodmanListNetworkRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Labels", default)]
    labels: Option<Labels>,
}

#[derive(Debug, Deserialize)]
struct PodmanVolumeRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Driver", default)]
    driver: Option<String>,
    #[serde(rename = "Labels", default)]
    labels: Option<Labels>,
    #[serde(rename = "Mountpoint", default)]
    mountpoint: Option<String>,
    #[serde(rename = "Scope", default)]
    scope: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    created_at: Option<String>,
}

fn parse_id_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_podman_container(record: PodmanListContainerRecord) -> Result<ListContainersItem> {
    let ports: Vec<PortBinding> = record
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|p| PortBinding {
            container_port: p.container_port,
            host_ip: p.host_ip,
            host_port: p.host_port,
            protocol: Protocol::parse(&p.protocol),
        })
        .collect();
    Ok(ListContainersItem {
        name: record
            .names
            .first()
            .map(|n| n.trim().to_string())
            .unwrap_or_default(),
        image: parse_docker_like_image_name(Some(&record.image))?,
        id: record.id,
        labels: record.labels.unwrap_or_default(),
        created_at: or_now(parse_unix_seconds(record.created)),
        ports,
        networks: record.networks.unwrap_or_default(),
        state: normalize_container_state(Some(&record.state), record.status.as_deref()),
        status: record.status,
    })
}

#[derive(Debug, Clone, Default)]
pub struct PodmanClient;

impl PodmanClient {
    pub fn new() -> Self {
        PodmanClient
    }
}

impl ContainerClient for PodmanClient {
    fn command_name(&self) -> &str {
        "podman"
    }

    fn display_name(&self) -> &str {
        "Podman"
    }

    fn version(&self) -> Result<CommandResponse<VersionItem>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.version_args(),
            |output, _strict| {
                let record: PodmanVersionRecord = parse_json(output)?;
                Ok(VersionItem {
                    client: record.client.api_version,
                    server: record.server.map(|s| s.api_version),
                })
            },
        ))
    }

    /// Podman's `info` does not report an operating system name; everything
    /// it runs is Linux.
    fn info(&self) -> Result<CommandResponse<InfoItem>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.info_args(),
            |output, _strict| {
                Ok(InfoItem {
                    operating_system: None,
                    os_type: Some(crate::contracts::types::ContainerOS::Linux),
                    raw: output.to_string(),
                })
            },
        ))
    }

    fn event_stream(&self, options: &EventStreamOptions) -> Result<StreamResponse<EventItem>> {
        Ok(StreamResponse::new(
            self.command_name(),
            self.event_stream_args(options),
            |line, _strict| {
                let record: PodmanEventRecord = parse_json(line)?;
                Ok(Some(EventItem {
                    event_type: EventType::parse(&record.event_type),
                    action: record.status,
                    actor: EventActor {
                        id: record.name,
                        attributes: crate::clients::docker_like::normalize::attributes_to_labels(
                            record.attributes,
                        ),
                    },
                    timestamp: or_now(parse_any_timestamp(&record.time)),
                    raw: line.to_string(),
                }))
            },
        ))
    }

    fn list_images(&self, options: &ListImagesOptions) -> Result<CommandResponse<Vec<ListImagesItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_images_args(options),
            |output, strict| {
                let records: Vec<PodmanListImageRecord> = parse_json_array(output, strict)?;
                collect_records(records, strict, |record| {
                    Ok(ListImagesItem {
                        image: parse_docker_like_image_name(
                            record.names.first().map(String::as_str),
                        )?,
                        id: record.id,
                        created_at: or_epoch(parse_unix_seconds(record.created)),
                        size: Some(record.size),
                    })
                })
            },
        ))
    }

    /// Podman prints the pruned image IDs with no summary line.
    fn prune_images(&self, options: &PruneImagesOptions) -> Result<CommandResponse<PruneResult>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.prune_images_args(options),
            |output, _strict| {
                Ok(PruneResult {
                    deleted: parse_id_lines(output),
                    space_reclaimed: None,
                })
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
                let records: Vec<PodmanListContainerRecord> = parse_json_array(output, strict)?;
                collect_records(records, strict, normalize_podman_container)
            },
        ))
    }

    fn prune_containers(&self) -> Result<CommandResponse<PruneResult>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.prune_containers_args(),
            |output, _strict| {
                Ok(PruneResult {
                    deleted: parse_id_lines(output),
                    space_reclaimed: None,
                })
            },
        ))
    }

    fn inspect_containers_format(&self) -> String {
        // Podman inspect output has no Platform field and only runs Linux
        // containers, so substitute a literal.
        go_template_json_format(CONTAINER_INSPECT_PROPERTIES, &[("Platform", "\"linux\"")])
    }

    fn list_networks(
        &self,
        options: &ListNetworksOptions,
    ) -> Result<CommandResponse<Vec<ListNetworkItem>>> {
        Ok(CommandResponse::new(
            self.command_name(),
            self.list_networks_args(options),
            |output, strict| {
                let records: Vec<PodmanListNetworkRecord> = parse_json_array(output, strict)?;
                Ok(records
                    .into_iter()
                    .map(|record| ListNetworkItem {
                        name: record.name,
                        labels: record.labels.unwrap_or_default(),
                        id: None,
                        driver: None,
                        scope: None,
                        ipv6: None,
                        internal: None,
                        created_at: None,
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
                // each array element is itself a JSON-encoded record
                let encoded: Vec<String> = parse_json_array(output, strict)?;
                let mut volumes = Vec::new();
                for entry in encoded {
                    match parse_json::<PodmanVolumeRecord>(&entry) {
                        Ok(record) => volumes.push(ListVolumeItem {
                            name: record.name,
                            driver: record.driver,
                            labels: record.labels.unwrap_or_default(),
                            mountpoint: record.mountpoint,
                            scope: record.scope,
                            created_at: record
                                .created_at
                                .as_deref()
                                .and_then(parse_any_timestamp),
                            size: None,
                        }),
                        Err(e) if strict => return Err(e),
                        Err(e) => tracing::debug!(error = %e, "dropping malformed volume record"),
                    }
                }
                Ok(volumes)
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_api_versions() {
        let client = PodmanClient::new();
        let response = client.version().unwrap();
        let output = r#"{"Client":{"APIVersion":"4.9.3"},"Server":{"APIVersion":"4.9.3"}}"#;
        let version = (response.parse)(output, true).unwrap();
        assert_eq!(version.client, "4.9.3");
        assert_eq!(version.server.as_deref(), Some("4.9.3"));
    }

    #[test]
    fn list_images_parses_array_with_unix_timestamps() {
        let client = PodmanClient::new();
        let response = client.list_images(&ListImagesOptions::default()).unwrap();
        let output = r#"[{"Id":"sha256:abc","Names":["docker.io/library/alpine:3.19"],"Size":7670000,"Created":1681128000}]"#;
        let images = (response.parse)(output, true).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].image.image.as_deref(), Some("library/alpine"));
        assert_eq!(images[0].size, Some(7_670_000));
        assert_eq!(images[0].created_at.timestamp(), 1_681_128_000);
    }

    #[test]
    fn list_containers_maps_structured_ports() {
        let client = PodmanClient::new();
        let response = client
            .list_containers(&ListContainersOptions::default())
            .unwrap();
        let output = r#"[{"Id":"c1","Names":["web"],"Image":"nginx:latest","Ports":[{"host_ip":"0.0.0.0","container_port":80,"host_port":8080,"protocol":"tcp"}],"Created":1681128000,"State":"running","Status":"Up 2 hours"}]"#;
        let containers = (response.parse)(output, true).unwrap();
        assert_eq!(containers[0].name, "web");
        assert_eq!(containers[0].ports[0].container_port, 80);
        assert_eq!(containers[0].ports[0].host_port, Some(8080));
        assert_eq!(containers[0].state, "running");
    }

    #[test]
    fn list_volumes_unwraps_double_encoded_records() {
        let client = PodmanClient::new();
        let response = client.list_volumes(&ListVolumesOptions::default()).unwrap();
        let inner = r#"{"Name":"data","Driver":"local","Mountpoint":"/var/lib/containers/storage/volumes/data/_data"}"#;
        let output = serde_json::to_string(&vec![inner]).unwrap();
        let volumes = (response.parse)(&output, true).unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, "data");
        assert_eq!(volumes[0].driver.as_deref(), Some("local"));
    }

    #[test]
    fn event_stream_maps_status_to_action() {
        let client = PodmanClient::new();
        let response = client.event_stream(&EventStreamOptions::default()).unwrap();
        let line = r#"{"Type":"container","Status":"start","Name":"web","Time":"2023-04-10T12:00:00Z","Attributes":{"image":"nginx"}}"#;
        let event = (response.parse_line)(line, true).unwrap().unwrap();
        assert_eq!(event.event_type, EventType::Container);
        assert_eq!(event.action, "start");
        assert_eq!(event.actor.id, "web");
        assert_eq!(event.actor.attributes.get("image").map(String::as_str), Some("nginx"));
    }

    #[test]
    fn inspect_format_substitutes_platform_literal() {
        let client = PodmanClient::new();
        let format = client.inspect_containers_format();
        assert!(format.contains(r#""Platform":"linux""#));
        assert!(format.contains("{{ json .State }}"));
    }
}
