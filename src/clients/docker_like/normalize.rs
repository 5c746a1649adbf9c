//! Normalizers from Docker-shaped raw records to the common schema.
//!
//! All free functions, so parse closures can call them without borrowing a
//! client. The strict flag governs record-internal leniency (a bad port
//! entry inside an otherwise good container record); record-level policy
//! lives in the JSON framing helpers.

use crate::clients::docker_like::records::*;
use crate::contracts::types::*;
use crate::error::{Error, Result};
use crate::parse::image_name::parse_docker_like_image_name;
use crate::parse::ip::normalize_ip_address;
use crate::parse::kv::{parse_env_entries, parse_label_string};
use crate::parse::ports::{parse_docker_raw_port_string, parse_port_key, parse_port_map};
use crate::parse::size::try_parse_size;
use crate::parse::state::normalize_container_state;
use crate::parse::timestamp::{or_epoch, or_now, parse_any_timestamp, parse_unix_seconds};

pub fn normalize_version(record: DockerVersionRecord) -> VersionItem {
    VersionItem {
        client: record.client.api_version,
        server: record.server.map(|s| s.api_version),
    }
}

pub fn normalize_info(record: DockerInfoRecord, raw: &str) -> InfoItem {
    InfoItem {
        os_type: record.os_type.as_deref().and_then(ContainerOS::parse),
        operating_system: record.operating_system,
        raw: raw.to_string(),
    }
}

pub(crate) fn attributes_to_labels(
    attributes: std::collections::BTreeMap<String, serde_json::Value>,
) -> Labels {
    attributes
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}

pub fn normalize_event(record: DockerEventRecord, raw: &str) -> EventItem {
    EventItem {
        event_type: EventType::parse(&record.event_type),
        action: record.action,
        actor: EventActor {
            id: record.actor.id,
            attributes: attributes_to_labels(record.actor.attributes),
        },
        timestamp: or_now(parse_unix_seconds(record.time)),
        raw: raw.to_string(),
    }
}

pub(crate) fn size_from_value(value: Option<&serde_json::Value>) -> Option<u64> {
    match value? {
        serde_json::Value::String(s) => try_parse_size(Some(s)),
        serde_json::Value::Number(n) => n.as_f64().map(|f| f.round() as u64),
        _ => None,
    }
}

pub fn normalize_list_image(record: DockerListImageRecord) -> Result<ListImagesItem> {
    let reference = if record.tag.is_empty() {
        record.repository.clone()
    } else {
        format!("{}:{}", record.repository, record.tag)
    };
    Ok(ListImagesItem {
        image: parse_docker_like_image_name(Some(&reference))?,
        // absent dates sort oldest rather than newest
        created_at: or_epoch(parse_any_timestamp(&record.created_at)),
        size: size_from_value(record.size.as_ref()),
        id: record.id,
    })
}

pub fn normalize_list_container(
    record: DockerListContainerRecord,
    strict: bool,
) -> Result<ListContainersItem> {
    let mut ports = Vec::new();
    for entry in record
        .ports
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        match parse_docker_raw_port_string(entry) {
            Some(binding) => ports.push(binding),
            None if strict => return Err(Error::parse(format!("invalid port entry {entry:?}"))),
            None => {}
        }
    }
    let networks = record
        .networks
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    let name = record
        .names
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    Ok(ListContainersItem {
        state: normalize_container_state(record.state.as_deref(), record.status.as_deref()),
        image: parse_docker_like_image_name(Some(&record.image))?,
        labels: parse_label_string(record.labels.as_deref()),
        created_at: or_now(record.created_at.as_deref().and_then(parse_any_timestamp)),
        id: record.id,
        name,
        ports,
        networks,
        status: record.status,
    })
}

pub fn normalize_list_volume(record: DockerListVolumeRecord) -> ListVolumeItem {
    ListVolumeItem {
        labels: parse_label_string(record.labels.as_deref()),
        created_at: record.created_at.as_deref().and_then(parse_any_timestamp),
        size: try_parse_size(record.size.as_deref()),
        name: record.name,
        driver: record.driver,
        mountpoint: record.mountpoint,
        scope: record.scope,
    }
}

fn string_bool(value: Option<&str>) -> Option<bool> {
    value.map(|v| v.eq_ignore_ascii_case("true"))
}

pub fn normalize_list_network(record: DockerListNetworkRecord) -> ListNetworkItem {
    ListNetworkItem {
        labels: parse_label_string(record.labels.as_deref()),
        ipv6: string_bool(record.ipv6.as_deref()),
        internal: string_bool(record.internal.as_deref()),
        created_at: record.created_at.as_deref().and_then(parse_any_timestamp),
        id: record.id,
        name: record.name,
        driver: record.driver,
        scope: record.scope,
    }
}

pub fn normalize_context(record: DockerContextRecord) -> ListContextItem {
    ListContextItem {
        name: record.name,
        current: record.current,
        description: record.description,
        container_endpoint: record.docker_endpoint,
    }
}

pub fn normalize_inspect_image(
    record: DockerInspectImageRecord,
    raw: &str,
) -> Result<InspectImagesItem> {
    let config = record.config.unwrap_or_default();
    let ports = config
        .exposed_ports
        .unwrap_or_default()
        .keys()
        .filter_map(|key| parse_port_key(key))
        .map(|(container_port, protocol)| PortBinding {
            container_port,
            host_ip: None,
            host_port: None,
            protocol,
        })
        .collect();
    // never pushed anywhere but a local registry means local-only
    let is_local_image = !record
        .repo_digests
        .iter()
        .any(|digest| !digest.to_ascii_lowercase().starts_with("localhost/"));
    Ok(InspectImagesItem {
        image: parse_docker_like_image_name(record.repo_tags.first().map(String::as_str))?,
        environment_variables: parse_env_entries(&config.env.unwrap_or_default()),
        volumes: config.volumes.unwrap_or_default().into_keys().collect(),
        labels: config.labels.unwrap_or_default(),
        entrypoint: StringOrList::into_vec(config.entrypoint),
        command: StringOrList::into_vec(config.cmd),
        current_directory: config.working_dir.filter(|d| !d.is_empty()),
        operating_system: record.os.as_deref().and_then(ContainerOS::parse),
        created_at: record.created.as_deref().and_then(parse_any_timestamp),
        user: config.user.filter(|u| !u.is_empty()),
        id: record.id,
        repo_digests: record.repo_digests,
        is_local_image,
        ports,
        architecture: record.architecture,
        raw: raw.to_string(),
    })
}

pub fn normalize_inspect_container(
    record: DockerInspectContainerRecord,
    raw: &str,
) -> Result<InspectContainersItem> {
    let config = record.config.unwrap_or_default();
    let state = record.state.unwrap_or_default();
    let network_settings = record.network_settings.unwrap_or_default();

    let networks = network_settings
        .networks
        .unwrap_or_default()
        .into_iter()
        .map(|(name, network)| InspectContainersNetwork {
            name,
            gateway: network.gateway.filter(|g| !g.is_empty()),
            ip_address: normalize_ip_address(network.ip_address.as_deref()),
            mac_address: network.mac_address.filter(|m| !m.is_empty()),
        })
        .collect();

    let ports = network_settings
        .ports
        .map(|map| parse_port_map(&map))
        .unwrap_or_default();

    let mounts = record
        .mounts
        .into_iter()
        .filter_map(|mount| {
            let mount_type = match mount.mount_type.as_deref() {
                Some("bind") => Some(MountType::Bind),
                Some("volume") => Some(MountType::Volume),
                _ => return None,
            };
            Some(InspectContainersMount {
                // volume mounts report the volume name as their source
                source: match mount_type {
                    Some(MountType::Volume) => mount.name.or(mount.source),
                    _ => mount.source,
                },
                destination: mount.destination,
                read_only: !mount.rw.unwrap_or(true),
                mount_type,
            })
        })
        .collect();

    let created_at = record.created.as_deref().and_then(parse_any_timestamp);
    // runtimes report epoch-adjacent placeholders for never-started containers
    let after_creation = |value: Option<chrono::DateTime<chrono::Utc>>| {
        value.filter(|ts| created_at.map_or(true, |created| *ts >= created))
    };

    Ok(InspectContainersItem {
        image: parse_docker_like_image_name(config.image.as_deref())?,
        environment_variables: parse_env_entries(&config.env.unwrap_or_default()),
        ip_address: normalize_ip_address(network_settings.ip_address.as_deref()),
        labels: config.labels.unwrap_or_default(),
        entrypoint: StringOrList::into_vec(config.entrypoint),
        command: StringOrList::into_vec(config.cmd),
        current_directory: config.working_dir.filter(|d| !d.is_empty()),
        started_at: after_creation(state.started_at.as_deref().and_then(parse_any_timestamp)),
        finished_at: after_creation(state.finished_at.as_deref().and_then(parse_any_timestamp)),
        status: state.status,
        operating_system: record.platform.as_deref().and_then(ContainerOS::parse),
        id: record.id,
        name: record.name,
        image_id: record.image,
        networks,
        ports,
        mounts,
        created_at,
        raw: raw.to_string(),
    })
}

pub fn normalize_inspect_volume(record: DockerInspectVolumeRecord, raw: &str) -> InspectVolumesItem {
    let options = record
        .options
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect();
    InspectVolumesItem {
        labels: record.labels.unwrap_or_default(),
        created_at: record.created_at.as_deref().and_then(parse_any_timestamp),
        name: record.name,
        driver: record.driver,
        mountpoint: record.mountpoint,
        scope: record.scope,
        options,
        raw: raw.to_string(),
    }
}

pub fn normalize_inspect_network(
    record: DockerInspectNetworkRecord,
    raw: &str,
) -> InspectNetworksItem {
    let ipam = record.ipam.unwrap_or_default();
    InspectNetworksItem {
        labels: record.labels.unwrap_or_default(),
        ipam_driver: ipam.driver,
        ipam_config: ipam
            .config
            .unwrap_or_default()
            .into_iter()
            .map(|config| NetworkIpamConfig {
                subnet: config.subnet,
                gateway: config.gateway,
            })
            .collect(),
        created_at: record.created.as_deref().and_then(parse_any_timestamp),
        id: record.id,
        name: record.name,
        driver: record.driver,
        scope: record.scope,
        ipv6: record.enable_ipv6,
        internal: record.internal,
        attachable: record.attachable,
        ingress: record.ingress,
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::json::parse_json;

    #[test]
    fn list_image_joins_repository_and_tag() {
        let record: DockerListImageRecord = parse_json(
            r#"{"ID":"sha256:abc","Repository":"ghcr.io/owner/tool","Tag":"v1","CreatedAt":"2023-04-10 12:00:00 +0000 UTC","Size":"62.95MB"}"#,
        )
        .unwrap();
        let item = normalize_list_image(record).unwrap();
        assert_eq!(item.image.registry.as_deref(), Some("ghcr.io"));
        assert_eq!(item.image.tag.as_deref(), Some("v1"));
        assert_eq!(item.size, Some(66_007_859));
    }

    #[test]
    fn dangling_image_has_epoch_created_at() {
        let record: DockerListImageRecord = parse_json(
            r#"{"ID":"sha256:abc","Repository":"<none>","Tag":"<none>","CreatedAt":"garbage","Size":null}"#,
        )
        .unwrap();
        let item = normalize_list_image(record).unwrap();
        assert_eq!(item.image.image, None);
        assert_eq!(item.created_at.timestamp(), 0);
        assert_eq!(item.size, None);
    }

    #[test]
    fn list_container_ports_lenient_vs_strict() {
        let json = r#"{"ID":"c1","Names":"web,alias","Image":"nginx","Ports":"0.0.0.0:80->80/tcp, junk","Networks":"bridge","Labels":"a=1","CreatedAt":"2023-04-10 12:00:00 +0000 UTC","State":"running","Status":"Up 2 hours"}"#;
        let record: DockerListContainerRecord = parse_json(json).unwrap();
        let item = normalize_list_container(record, false).unwrap();
        assert_eq!(item.name, "web");
        assert_eq!(item.ports.len(), 1);
        assert_eq!(item.state, "running");

        let record: DockerListContainerRecord = parse_json(json).unwrap();
        assert!(normalize_list_container(record, true).is_err());
    }

    #[test]
    fn inspect_image_normalizes_config() {
        let record: DockerInspectImageRecord = parse_json(
            r#"{
                "Id": "sha256:abc",
                "RepoTags": ["alpine:3.19"],
                "RepoDigests": ["alpine@sha256:feed"],
                "Architecture": "amd64",
                "Os": "linux",
                "Created": "2023-04-10T12:00:00Z",
                "Config": {
                    "Entrypoint": "/entry.sh",
                    "Cmd": ["run", "--fast"],
                    "Env": ["PATH=/bin", "MODE=x=y"],
                    "ExposedPorts": {"80/tcp": {}},
                    "Volumes": {"/data": {}},
                    "WorkingDir": "/app",
                    "User": ""
                }
            }"#,
        )
        .unwrap();
        let item = normalize_inspect_image(record, "{}").unwrap();
        assert_eq!(item.entrypoint, vec!["/entry.sh"]);
        assert_eq!(item.command, vec!["run", "--fast"]);
        assert_eq!(
            item.environment_variables.get("MODE").map(String::as_str),
            Some("x=y")
        );
        assert_eq!(item.ports[0].container_port, 80);
        assert_eq!(item.volumes, vec!["/data"]);
        assert_eq!(item.operating_system, Some(ContainerOS::Linux));
        assert!(!item.is_local_image);
        assert_eq!(item.user, None);
    }

    #[test]
    fn inspect_container_null_port_binding() {
        let record: DockerInspectContainerRecord = parse_json(
            r#"{
                "Id": "c1",
                "Name": "/web",
                "Image": "sha256:abc",
                "Created": "2023-04-10T12:00:00Z",
                "Mounts": [
                    {"Type":"bind","Source":"/host","Destination":"/data","RW":false},
                    {"Type":"volume","Name":"vol1","Source":"/var/lib","Destination":"/state","RW":true}
                ],
                "State": {"Status":"running","StartedAt":"2023-04-10T12:00:05Z","FinishedAt":"0001-01-01T00:00:00Z"},
                "Config": {"Image":"nginx:1.25","Env":["A=1"],"Entrypoint":null,"Cmd":null},
                "NetworkSettings": {
                    "IPAddress": "[fe80::1]",
                    "Networks": {"bridge": {"Gateway":"172.17.0.1","IPAddress":"172.17.0.2","MacAddress":""}},
                    "Ports": {"80/tcp": null}
                }
            }"#,
        )
        .unwrap();
        let item = normalize_inspect_container(record, "{}").unwrap();
        assert_eq!(item.ip_address.as_deref(), Some("fe80::1"));
        assert_eq!(item.ports.len(), 1);
        assert_eq!(item.ports[0].host_port, None);
        assert_eq!(item.mounts[0].read_only, true);
        assert_eq!(item.mounts[1].source.as_deref(), Some("vol1"));
        assert!(item.started_at.is_some());
        assert_eq!(item.finished_at, None);
        assert_eq!(item.networks[0].mac_address, None);
        assert_eq!(item.image.tag.as_deref(), Some("1.25"));
    }
}
