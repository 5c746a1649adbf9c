//! Runners: the pluggable execution side of the command/parse contract.
//!
//! [`ShellRunner`] renders a response's annotated arguments with a [`Shell`]
//! strategy and hands the joined command line to that shell's interpreter
//! (`sh -c`, `cmd /C`, ...), so the quoting is actually parsed; `NoShell`
//! passes raw tokens as direct argv instead. [`WslRunner`] quotes the inner
//! command for bash first and then wraps it in a `wsl.exe` invocation, so a
//! Windows host can drive a runtime installed inside a WSL distribution.

use std::path::PathBuf;
use std::time::Duration;

use crate::contracts::response::{CommandResponse, StreamResponse};
use crate::error::Result;
use crate::exec::cancel::CancellationToken;
use crate::exec::spawn::{
    spawn_buffered, spawn_buffered_with_input, spawn_streaming, SpawnOptions,
};
use crate::exec::stream::CommandStream;
use crate::shell::{default_shell, Bash, Shell};

/// Execution knobs shared by all runners.
pub struct RunnerOptions {
    /// Strict parsing aborts on the first malformed record; lenient parsing
    /// drops it and keeps going.
    pub strict: bool,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub cancellation: CancellationToken,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            strict: false,
            cwd: None,
            env: Vec::new(),
            timeout: None,
            cancellation: CancellationToken::none(),
        }
    }
}

impl RunnerOptions {
    fn spawn_options(&self) -> SpawnOptions {
        SpawnOptions {
            cwd: self.cwd.clone(),
            env: self.env.clone(),
            timeout: self.timeout,
            cancellation: self.cancellation.clone(),
        }
    }
}

/// The command string may name a subcommand chain ("docker compose"); only
/// the first token is the program, the rest become leading argv entries.
fn split_program(command: &str) -> (String, Vec<String>) {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next().unwrap_or_default();
    (program, parts.collect())
}

/// Runs responses on the local host through a shell quoting strategy.
pub struct ShellRunner {
    shell: Box<dyn Shell>,
    pub options: RunnerOptions,
}

impl ShellRunner {
    pub fn new(shell: Box<dyn Shell>, options: RunnerOptions) -> Self {
        Self { shell, options }
    }

    /// The platform-default shell with default options.
    pub fn with_defaults() -> Self {
        Self::new(default_shell(), RunnerOptions::default())
    }

    /// Quoted tokens only mean something to the shell that parses them, so
    /// shells with an interpreter get the whole command line as one string;
    /// `NoShell` gets raw tokens as direct argv.
    fn render(&self, command: &str, args: &crate::args::CommandLineArgs) -> (String, Vec<String>) {
        let quoted = self.shell.render(args);
        match self.shell.invocation() {
            Some(invocation) => {
                let mut line = command.to_string();
                for token in &quoted {
                    line.push(' ');
                    line.push_str(token);
                }
                (invocation.program, vec![invocation.command_flag, line])
            }
            None => {
                let (program, mut argv) = split_program(command);
                argv.extend(quoted);
                (program, argv)
            }
        }
    }

    pub fn run<T>(&self, response: &CommandResponse<T>) -> Result<T> {
        let (program, argv) = self.render(&response.command, &response.args);
        let output = spawn_buffered(&program, &argv, &self.options.spawn_options())?;
        (response.parse)(&output, self.options.strict)
    }

    /// Run with bytes piped to the child's stdin (used by file writes).
    pub fn run_with_input<T>(&self, response: &CommandResponse<T>, input: &[u8]) -> Result<T> {
        let (program, argv) = self.render(&response.command, &response.args);
        let output = spawn_buffered_with_input(
            &program,
            &argv,
            &self.options.spawn_options(),
            Some(input),
        )?;
        (response.parse)(&output, self.options.strict)
    }

    pub fn stream<T>(&self, response: StreamResponse<T>) -> Result<CommandStream<T>> {
        let (program, argv) = self.render(&response.command, &response.args);
        let child = spawn_streaming(&program, &argv, &self.options.spawn_options())?;
        Ok(CommandStream::new(
            child,
            response.parse_line,
            self.options.strict,
        ))
    }
}

/// Runs responses inside a WSL distribution from a Windows host.
///
/// Arguments are quoted for the bash that runs inside the distribution, then
/// passed as opaque argv entries after `wsl.exe [-d <distro>] --`; wsl.exe
/// forwards them without another quoting layer.
pub struct WslRunner {
    wsl_path: String,
    distro: Option<String>,
    pub options: RunnerOptions,
}

impl WslRunner {
    pub fn new(distro: Option<String>, options: RunnerOptions) -> Self {
        Self {
            wsl_path: "wsl.exe".to_string(),
            distro,
            options,
        }
    }

    fn render(&self, command: &str, args: &crate::args::CommandLineArgs) -> Vec<String> {
        let mut argv = Vec::new();
        if let Some(distro) = &self.distro {
            argv.push("-d".to_string());
            argv.push(distro.clone());
        }
        argv.push("--".to_string());
        let (program, leading) = split_program(command);
        argv.push(program);
        argv.extend(leading);
        argv.extend(Bash.render(args));
        argv
    }

    pub fn run<T>(&self, response: &CommandResponse<T>) -> Result<T> {
        let argv = self.render(&response.command, &response.args);
        let output = spawn_buffered(&self.wsl_path, &argv, &self.options.spawn_options())?;
        (response.parse)(&output, self.options.strict)
    }

    pub fn stream<T>(&self, response: StreamResponse<T>) -> Result<CommandStream<T>> {
        let argv = self.render(&response.command, &response.args);
        let child = spawn_streaming(&self.wsl_path, &argv, &self.options.spawn_options())?;
        Ok(CommandStream::new(
            child,
            response.parse_line,
            self.options.strict,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{compose_args, escaped, quoted, with_arg};

    fn sample_args() -> crate::args::CommandLineArgs {
        compose_args([with_arg(escaped("run")), with_arg(quoted("my image"))]).build()
    }

    #[test]
    fn bash_render_hands_one_string_to_the_interpreter() {
        let runner = ShellRunner::new(Box::new(Bash), RunnerOptions::default());
        let (program, argv) = runner.render("docker", &sample_args());
        assert_eq!(program, "/bin/sh");
        assert_eq!(argv, vec!["-c", "docker run 'my image'"]);
    }

    #[test]
    fn no_shell_render_is_direct_argv() {
        use crate::shell::NoShell;

        let runner = ShellRunner::new(
            Box::new(NoShell::for_windows(false)),
            RunnerOptions::default(),
        );
        let (program, argv) = runner.render("docker compose", &sample_args());
        assert_eq!(program, "docker");
        assert_eq!(argv, vec!["compose", "run", "my image"]);
    }

    #[test]
    fn split_program_handles_subcommand_chains() {
        let (program, leading) = split_program("docker compose");
        assert_eq!(program, "docker");
        assert_eq!(leading, vec!["compose".to_string()]);
    }

    #[test]
    fn wsl_render_wraps_with_distro() {
        let runner = WslRunner::new(Some("ubuntu".to_string()), RunnerOptions::default());
        let argv = runner.render("docker", &sample_args());
        assert_eq!(
            argv,
            vec!["-d", "ubuntu", "--", "docker", "run", "'my image'"]
        );
    }

    #[test]
    fn wsl_render_without_distro() {
        let runner = WslRunner::new(None, RunnerOptions::default());
        let argv = runner.render("docker", &sample_args());
        assert_eq!(argv, vec!["--", "docker", "run", "'my image'"]);
    }

    #[cfg(unix)]
    #[test]
    fn shell_runner_executes_and_parses() {
        use crate::contracts::response::CommandResponse;
        use crate::shell::NoShell;

        let args = compose_args([with_arg(escaped("hello world"))]).build();
        let response = CommandResponse::new("/bin/echo", args, |out: &str, _| {
            Ok(out.trim().to_string())
        });
        let runner = ShellRunner::new(Box::new(NoShell::for_windows(false)), RunnerOptions::default());
        assert_eq!(runner.run(&response).unwrap(), "hello world");
    }

    #[cfg(unix)]
    #[test]
    fn shell_runner_streams_lines() {
        use crate::contracts::response::StreamResponse;
        use crate::shell::NoShell;

        let args = compose_args([
            with_arg(escaped("-c")),
            with_arg(escaped("printf '1\\n2\\nx\\n'")),
        ])
        .build();
        let response = StreamResponse::new("/bin/sh", args, |line: &str, _| {
            Ok(line.parse::<i32>().ok())
        });
        let runner = ShellRunner::new(Box::new(NoShell::for_windows(false)), RunnerOptions::default());
        let items: Vec<i32> = runner
            .stream(response)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(items, vec![1, 2]);
    }
}
