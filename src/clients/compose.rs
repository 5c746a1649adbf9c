//! Compose orchestrator client.
//!
//! All four runtimes front the same compose CLI surface; what varies is the
//! command and whether `compose` is a subcommand (v2, `docker compose`) or
//! baked into the binary name (v1, `docker-compose`). File, env-file,
//! project, and profile selection render before the subcommand.

use crate::args::{
    compose_args, escaped, with_arg, with_flag_arg, with_named_arg, with_verbatim_arg, ArgFn,
};
use crate::contracts::options::{
    CommonOrchestratorOptions, ConfigOptions, DownOptions, LogsOptions, RestartOptions,
    StartOptions, StopOptions, UpOptions,
};
use crate::contracts::response::{CommandResponse, StreamResponse};
use crate::error::Result;

fn with_common_args(options: &CommonOrchestratorOptions) -> ArgFn {
    let files = with_named_arg("--file", options.files.clone());
    let env_file = with_named_arg("--env-file", options.environment_file.clone());
    let project = with_named_arg("--project-name", options.project_name.clone());
    Box::new(move |line| project(env_file(files(line))))
}

#[derive(Debug, Clone)]
pub struct ComposeClient {
    command: String,
    /// `compose` is emitted as a leading subcommand for v2 CLIs.
    compose_v2: bool,
}

impl ComposeClient {
    pub fn new(command: impl Into<String>, compose_v2: bool) -> Self {
        Self {
            command: command.into(),
            compose_v2,
        }
    }

    /// `docker compose` (v2).
    pub fn docker() -> Self {
        Self::new("docker", true)
    }

    /// The standalone v1 `docker-compose` binary.
    pub fn docker_compose_v1() -> Self {
        Self::new("docker-compose", false)
    }

    pub fn podman() -> Self {
        Self::new("podman", true)
    }

    pub fn finch() -> Self {
        Self::new("finch", true)
    }

    pub fn nerdctl() -> Self {
        Self::new("nerdctl", true)
    }

    pub fn command_name(&self) -> &str {
        &self.command
    }

    fn with_compose_arg(&self) -> ArgFn {
        with_flag_arg("compose", self.compose_v2)
    }

    pub fn up(&self, options: &UpOptions) -> Result<CommandResponse<()>> {
        let scale: Vec<String> = options
            .scale
            .iter()
            .map(|(service, replicas)| format!("{service}={replicas}"))
            .collect();
        let args = compose_args([
            self.with_compose_arg(),
            with_common_args(&options.common),
            with_named_arg("--profile", options.profiles.clone()),
            with_arg(escaped("up")),
            with_flag_arg("--detach", options.detached),
            with_flag_arg("--build", options.build),
            with_named_arg("--scale", scale),
            with_flag_arg("--wait", options.wait),
            with_verbatim_arg(options.custom_options.clone()),
            with_arg(options.services.clone()),
        ])
        .build();
        Ok(CommandResponse::new(&self.command, args, |_, _| Ok(())))
    }

    pub fn down(&self, options: &DownOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            self.with_compose_arg(),
            with_common_args(&options.common),
            with_arg(escaped("down")),
            with_named_arg("--rmi", options.remove_images.clone()),
            with_flag_arg("--volumes", options.remove_volumes),
            with_named_arg("--timeout", options.timeout_seconds.map(|t| t.to_string())),
            with_verbatim_arg(options.custom_options.clone()),
        ])
        .build();
        Ok(CommandResponse::new(&self.command, args, |_, _| Ok(())))
    }

    pub fn start(&self, options: &StartOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            self.with_compose_arg(),
            with_common_args(&options.common),
            with_arg(escaped("start")),
            with_arg(options.services.clone()),
        ])
        .build();
        Ok(CommandResponse::new(&self.command, args, |_, _| Ok(())))
    }

    pub fn stop(&self, options: &StopOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            self.with_compose_arg(),
            with_common_args(&options.common),
            with_arg(escaped("stop")),
            with_named_arg("--timeout", options.timeout_seconds.map(|t| t.to_string())),
            with_arg(options.services.clone()),
        ])
        .build();
        Ok(CommandResponse::new(&self.command, args, |_, _| Ok(())))
    }

    pub fn restart(&self, options: &RestartOptions) -> Result<CommandResponse<()>> {
        let args = compose_args([
            self.with_compose_arg(),
            with_common_args(&options.common),
            with_arg(escaped("restart")),
            with_named_arg("--timeout", options.timeout_seconds.map(|t| t.to_string())),
            with_arg(options.services.clone()),
        ])
        .build();
        Ok(CommandResponse::new(&self.command, args, |_, _| Ok(())))
    }

    pub fn logs(&self, options: &LogsOptions) -> Result<StreamResponse<String>> {
        let args = compose_args([
            self.with_compose_arg(),
            with_common_args(&options.common),
            with_arg(escaped("logs")),
            with_flag_arg("--follow", options.follow),
            with_named_arg("--tail", options.tail.map(|t| t.to_string())),
            with_arg(options.services.clone()),
        ])
        .build();
        Ok(StreamResponse::new(&self.command, args, |line, _strict| {
            Ok(Some(line.to_string()))
        }))
    }

    /// Lists one kind of item from the resolved configuration, one name per
    /// output line.
    pub fn config(&self, options: &ConfigOptions) -> Result<CommandResponse<Vec<String>>> {
        let args = compose_args([
            self.with_compose_arg(),
            with_common_args(&options.common),
            with_arg(escaped("config")),
            with_arg(escaped(options.config_type.as_flag())),
        ])
        .build();
        Ok(CommandResponse::new(
            &self.command,
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

    /// `compose version`, passed through for install checks.
    pub fn check_install(&self) -> Result<CommandResponse<String>> {
        let args = compose_args([self.with_compose_arg(), with_arg(escaped("version"))]).build();
        Ok(CommandResponse::new(
            &self.command,
            args,
            |output, _strict| Ok(output.trim().to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::CommandLineArgs;
    use crate::contracts::options::ConfigItemType;

    fn values(args: &CommandLineArgs) -> Vec<&str> {
        args.iter().map(|a| a.value.as_str()).collect()
    }

    #[test]
    fn up_renders_selection_before_subcommand() {
        let client = ComposeClient::docker();
        let options = UpOptions {
            common: CommonOrchestratorOptions {
                files: vec!["docker-compose.yml".to_string()],
                project_name: Some("myproj".to_string()),
                ..Default::default()
            },
            detached: true,
            profiles: vec!["dev".to_string()],
            services: vec!["web".to_string()],
            ..Default::default()
        };
        let response = client.up(&options).unwrap();
        assert_eq!(response.command, "docker");
        assert_eq!(
            values(&response.args),
            [
                "compose",
                "--file",
                "docker-compose.yml",
                "--project-name",
                "myproj",
                "--profile",
                "dev",
                "up",
                "--detach",
                "web",
            ]
        );
    }

    #[test]
    fn v1_omits_compose_subcommand() {
        let client = ComposeClient::docker_compose_v1();
        let response = client.check_install().unwrap();
        assert_eq!(response.command, "docker-compose");
        assert_eq!(values(&response.args), ["version"]);
    }

    #[test]
    fn down_flags() {
        let client = ComposeClient::finch();
        let options = DownOptions {
            remove_images: Some("all".to_string()),
            remove_volumes: true,
            timeout_seconds: Some(10),
            ..Default::default()
        };
        let response = client.down(&options).unwrap();
        assert_eq!(
            values(&response.args),
            ["compose", "down", "--rmi", "all", "--volumes", "--timeout", "10"]
        );
    }

    #[test]
    fn config_emits_type_flag() {
        let client = ComposeClient::podman();
        let options = ConfigOptions {
            common: CommonOrchestratorOptions::default(),
            config_type: ConfigItemType::Services,
        };
        let response = client.config(&options).unwrap();
        assert_eq!(values(&response.args), ["compose", "config", "--services"]);
    }

    #[test]
    fn scale_pairs_render_as_assignments() {
        let client = ComposeClient::docker();
        let mut options = UpOptions::default();
        options.scale.insert("web".to_string(), 3);
        let response = client.up(&options).unwrap();
        let rendered = values(&response.args);
        let position = rendered.iter().position(|a| *a == "--scale").unwrap();
        assert_eq!(rendered[position + 1], "web=3");
    }
}
