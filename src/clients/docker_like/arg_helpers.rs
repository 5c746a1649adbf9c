//! Reusable argument fragments for Docker-compatible CLIs.
//!
//! Each helper returns an [`ArgFn`] so clients can splice them into
//! `compose_args` chains. They clone what they need: the closures are
//! deferred and must own their data.

use crate::args::{escaped, go_template, with_arg, with_flag_arg, with_named_arg, ArgFn};
use crate::contracts::options::LabelFilters;
use crate::contracts::options::RunContainerMount;
use crate::contracts::types::{Labels, MountType, PortBinding};

/// `--format {{json .}}`: ask for one JSON object per record regardless of
/// the CLI's default table layout.
pub fn with_json_format_arg() -> ArgFn {
    with_named_arg("--format", [go_template("{{json .}}")])
}

pub fn with_no_trunc_arg() -> ArgFn {
    with_flag_arg("--no-trunc", true)
}

/// `--filter label=key` / `--filter label=key=value` per filter entry.
pub fn with_label_filter_args(filters: &LabelFilters) -> ArgFn {
    let rendered: Vec<String> = filters
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!("label={key}={value}"),
            None => format!("label={key}"),
        })
        .collect();
    Box::new(move |args| {
        let mut args = args;
        for filter in &rendered {
            args = with_named_arg("--filter", [filter.as_str()])(args);
        }
        args
    })
}

/// `--label key=value` per label.
pub fn with_labels_arg(labels: &Labels) -> ArgFn {
    let rendered: Vec<String> = labels
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    with_named_arg("--label", rendered)
}

/// `--env key=value` per variable.
pub fn with_env_arg(env: &Labels) -> ArgFn {
    let rendered: Vec<String> = env
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    with_named_arg("--env", rendered)
}

/// `--publish [ip:][hostPort:]containerPort[/protocol]` per binding.
pub fn with_ports_arg(ports: &[PortBinding]) -> ArgFn {
    let rendered: Vec<String> = ports
        .iter()
        .map(|binding| {
            let mut spec = String::new();
            if let Some(ip) = &binding.host_ip {
                spec.push_str(ip);
                spec.push(':');
            }
            if let Some(host_port) = binding.host_port {
                spec.push_str(&host_port.to_string());
                spec.push(':');
            } else if binding.host_ip.is_some() {
                // an IP without a port still needs the separator
                spec.push(':');
            }
            spec.push_str(&binding.container_port.to_string());
            if let Some(protocol) = binding.protocol {
                spec.push('/');
                spec.push_str(protocol.as_str());
            }
            spec
        })
        .collect();
    with_named_arg("--publish", rendered)
}

/// `--mount type=...,source=...,destination=...[,readonly]` per mount.
pub fn with_mounts_arg(mounts: &[RunContainerMount]) -> ArgFn {
    let rendered: Vec<String> = mounts
        .iter()
        .map(|mount| {
            let mount_type = match mount.mount_type {
                MountType::Bind => "bind",
                MountType::Volume => "volume",
            };
            let mut spec = format!(
                "type={},source={},destination={}",
                mount_type, mount.source, mount.destination
            );
            if mount.read_only {
                spec.push_str(",readonly");
            }
            spec
        })
        .collect();
    with_named_arg("--mount", rendered)
}

/// `--add-host host:ip` per pair.
pub fn with_add_host_arg(hosts: &[(String, String)]) -> ArgFn {
    let rendered: Vec<String> = hosts
        .iter()
        .map(|(host, ip)| format!("{host}:{ip}"))
        .collect();
    with_named_arg("--add-host", rendered)
}

/// The `container:path` operand used by `cp` and file inspection.
pub fn with_container_path_arg(container: &str, path: &str) -> ArgFn {
    with_arg(escaped(format!("{container}:{path}")))
}

/// Single-quote a value for embedding in an in-container `/bin/sh -c`
/// payload. This quoting targets the shell inside the container, not the
/// host shell the runner renders for.
pub fn quote_single(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
