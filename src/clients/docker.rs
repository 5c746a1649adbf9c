//! Docker CLI client.
//!
//! Docker is the reference command shape, so almost everything is the trait
//! default; only context management is Docker-specific.

use crate::args::{compose_args, escaped, with_arg};
use crate::clients::container_client::ContainerClient;
use crate::clients::docker_like::normalize;
use crate::clients::docker_like::records::{DockerContextRecord, DockerInspectContextRecord};
use crate::contracts::options::{InspectContextsOptions, RemoveContextsOptions, UseContextOptions};
use crate::contracts::response::CommandResponse;
use crate::contracts::types::{InspectContextItem, ListContextItem};
use crate::error::Result;
use crate::parse::json::{parse_ndjson, parse_with_raw};

use super::docker_like::arg_helpers::with_json_format_arg;

#[derive(Debug, Clone, Default)]
pub struct DockerClient;

impl DockerClient {
    pub fn new() -> Self {
        DockerClient
    }
}

impl ContainerClient for DockerClient {
    fn command_name(&self) -> &str {
        "docker"
    }

    fn display_name(&self) -> &str {
        "Docker"
    }

    fn list_contexts(&self) -> Result<CommandResponse<Vec<ListContextItem>>> {
        let args = compose_args([
            with_arg([escaped("context"), escaped("ls")]),
            with_json_format_arg(),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, strict| {
                let records: Vec<DockerContextRecord> = parse_ndjson(output, strict)?;
                Ok(records.into_iter().map(normalize::normalize_context).collect())
            },
        ))
    }

    fn use_context(&self, options: &UseContextOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            with_arg([escaped("context"), escaped("use")]),
            with_arg(escaped(options.context.clone())),
        ])
        .build();
        Ok(CommandResponse::new(self.command_name(), args, |_, _| Ok(())))
    }

    fn remove_contexts(&self, options: &RemoveContextsOptions) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            with_arg([escaped("context"), escaped("rm")]),
            with_arg(options.contexts.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, _strict| {
                Ok(output
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect())
            },
        ))
    }

    fn inspect_contexts(
        &self,
        options: &InspectContextsOptions,
    ) -> Result<CommandResponse<Vec<InspectContextItem>>> {
        let args = compose_args([
            with_arg([escaped("context"), escaped("inspect")]),
            with_arg(options.contexts.clone()),
        ])
        .build();
        Ok(CommandResponse::new(
            self.command_name(),
            args,
            |output, strict| {
                parse_with_raw(output, strict, |record: DockerInspectContextRecord, raw| {
                    Ok(InspectContextItem {
                        name: record.name,
                        raw: raw.to_string(),
                    })
                })
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::options::ListImagesOptions;

    fn values(args: &crate::args::CommandLineArgs) -> Vec<&str> {
        args.iter().map(|a| a.value.as_str()).collect()
    }

    #[test]
    fn list_images_default_shape() {
        let client = DockerClient::new();
        let response = client
            .list_images(&ListImagesOptions {
                all: true,
                dangling: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(response.command, "docker");
        assert_eq!(
            values(&response.args),
            [
                "image",
                "ls",
                "--all",
                "--filter",
                "dangling=true",
                "--no-trunc",
                "--format",
                "{{json .}}",
            ]
        );
    }

    #[test]
    fn context_ls_uses_json_format() {
        let client = DockerClient::new();
        let response = client.list_contexts().unwrap();
        assert_eq!(
            values(&response.args),
            ["context", "ls", "--format", "{{json .}}"]
        );
    }

    #[test]
    fn context_ls_parses_records() {
        let client = DockerClient::new();
        let response = client.list_contexts().unwrap();
        let output = concat!(
            "{\"Name\":\"default\",\"Current\":true,\"Description\":\"Current DOCKER_HOST\",\"DockerEndpoint\":\"unix:///var/run/docker.sock\"}\n",
            "{\"Name\":\"remote\",\"Current\":false,\"DockerEndpoint\":\"ssh://host\"}\n",
        );
        let contexts = (response.parse)(output, true).unwrap();
        assert_eq!(contexts.len(), 2);
        assert!(contexts[0].current);
        assert_eq!(contexts[1].name, "remote");
        assert_eq!(contexts[1].container_endpoint.as_deref(), Some("ssh://host"));
    }
}
