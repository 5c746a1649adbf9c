//! Port strings and port maps.
//!
//! Runtimes print ports in three shapes: the raw list-output string
//! (`0.0.0.0:8080->80/tcp`, or just `80/tcp` for an unbound exposure), the
//! map keys of `Config.ExposedPorts` (`80/tcp`), and the
//! `NetworkSettings.Ports` JSON map whose values may be `null`.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::contracts::types::{PortBinding, Protocol};
use crate::parse::ip::normalize_ip_address;

/// Parses a `port[/protocol]` key such as `8080/tcp`.
pub fn parse_port_key(key: &str) -> Option<(u16, Option<Protocol>)> {
    let (port, protocol) = match key.split_once('/') {
        Some((port, protocol)) => (port, Protocol::parse(protocol)),
        None => (key, None),
    };
    Some((port.trim().parse().ok()?, protocol))
}

/// Parses one entry of the raw `Ports` column.
///
/// Bound form: `hostIp:hostPort->containerPort/protocol` (host IP optional,
/// IPv6 host IPs bracketed). Unbound form: `containerPort/protocol`.
pub fn parse_docker_raw_port_string(entry: &str) -> Option<PortBinding> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    match entry.split_once("->") {
        Some((host, container)) => {
            let (container_port, protocol) = parse_port_key(container)?;
            let (host_ip, host_port) = split_host_part(host)?;
            Some(PortBinding {
                container_port,
                host_ip: normalize_ip_address(host_ip.as_deref()),
                host_port,
                protocol,
            })
        }
        None => {
            let (container_port, protocol) = parse_port_key(entry)?;
            Some(PortBinding {
                container_port,
                host_ip: None,
                host_port: None,
                protocol,
            })
        }
    }
}

// `[::]:8080` or `0.0.0.0:8080` or `8080`.
fn split_host_part(host: &str) -> Option<(Option<String>, Option<u16>)> {
    let host = host.trim();
    if host.is_empty() {
        return Some((None, None));
    }
    match host.rfind(':') {
        Some(idx) if !host[idx + 1..].is_empty() => {
            let port = host[idx + 1..].parse().ok()?;
            Some((Some(host[..idx].to_string()), Some(port)))
        }
        _ => Some((None, host.parse().ok())),
    }
}

/// One leg of a `NetworkSettings.Ports` binding list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPortHostBinding {
    #[serde(rename = "HostIp")]
    pub host_ip: Option<String>,
    #[serde(rename = "HostPort")]
    pub host_port: Option<String>,
}

/// Normalizes a `NetworkSettings.Ports` map. A key mapped to `null` is an
/// exposed-but-unbound port and still yields a binding.
pub fn parse_port_map(
    ports: &BTreeMap<String, Option<Vec<RawPortHostBinding>>>,
) -> Vec<PortBinding> {
    let mut result = Vec::new();
    for (key, bindings) in ports {
        let Some((container_port, protocol)) = parse_port_key(key) else {
            continue;
        };
        match bindings {
            None => result.push(PortBinding {
                container_port,
                host_ip: None,
                host_port: None,
                protocol,
            }),
            Some(bindings) => {
                for binding in bindings {
                    result.push(PortBinding {
                        container_port,
                        host_ip: normalize_ip_address(binding.host_ip.as_deref()),
                        host_port: binding
                            .host_port
                            .as_deref()
                            .and_then(|p| p.trim().parse().ok()),
                        protocol,
                    });
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_ipv4() {
        let binding = parse_docker_raw_port_string("0.0.0.0:8080->80/tcp").unwrap();
        assert_eq!(binding.container_port, 80);
        assert_eq!(binding.host_ip.as_deref(), Some("0.0.0.0"));
        assert_eq!(binding.host_port, Some(8080));
        assert_eq!(binding.protocol, Some(Protocol::Tcp));
    }

    #[test]
    fn bound_ipv6_bracketed() {
        let binding = parse_docker_raw_port_string("[::]:8080->80/udp").unwrap();
        assert_eq!(binding.host_ip.as_deref(), Some("::"));
        assert_eq!(binding.host_port, Some(8080));
        assert_eq!(binding.protocol, Some(Protocol::Udp));
    }

    #[test]
    fn unbound_exposure() {
        let binding = parse_docker_raw_port_string("443/tcp").unwrap();
        assert_eq!(binding.container_port, 443);
        assert_eq!(binding.host_ip, None);
        assert_eq!(binding.host_port, None);
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_docker_raw_port_string(""), None);
        assert_eq!(parse_docker_raw_port_string("web->app"), None);
    }

    #[test]
    fn null_map_entry_keeps_container_port() {
        let mut map = BTreeMap::new();
        map.insert("80/tcp".to_string(), None);
        map.insert(
            "443/tcp".to_string(),
            Some(vec![RawPortHostBinding {
                host_ip: Some("0.0.0.0".to_string()),
                host_port: Some("8443".to_string()),
            }]),
        );
        let bindings = parse_port_map(&map);
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].container_port, 443);
        assert_eq!(bindings[0].host_port, Some(8443));
        assert_eq!(bindings[1].container_port, 80);
        assert_eq!(bindings[1].host_port, None);
    }
}
