//! Runner behavior against real child processes.
//!
//! These use coreutils and `sh` only, so they run on any unix host; each
//! test builds a throwaway `CommandResponse` rather than going through a
//! runtime client.

#![cfg(unix)]

use std::time::Duration;

use container_client::args::{compose_args, escaped, quoted, with_arg, with_named_arg};
use container_client::contracts::response::{CommandResponse, StreamResponse};
use container_client::error::Error;
use container_client::exec::{CancellationToken, RunnerOptions, ShellRunner};
use container_client::shell::NoShell;

fn no_shell_runner(options: RunnerOptions) -> ShellRunner {
    ShellRunner::new(Box::new(NoShell::for_windows(false)), options)
}

#[test]
fn buffered_run_captures_stdout() -> anyhow::Result<()> {
    let args = compose_args([with_arg([escaped("hello"), escaped("world")])]).build();
    let response = CommandResponse::new("echo", args, |output, _| Ok(output.trim().to_string()));
    let runner = no_shell_runner(RunnerOptions::default());
    assert_eq!(runner.run(&response)?, "hello world");
    Ok(())
}

#[test]
fn strong_quoted_values_reach_the_child_unmangled() {
    // Direct argv spawn: the quote class annotates intent, the value itself
    // is passed through byte-for-byte.
    let hostile = "O'Brien; $(reboot) && echo pwned";
    let args = compose_args([with_arg(quoted(hostile))]).build();
    let response = CommandResponse::new("echo", args, |output, _| Ok(output.trim().to_string()));
    let runner = no_shell_runner(RunnerOptions::default());
    assert_eq!(runner.run(&response).unwrap(), hostile);
}

#[test]
fn default_shell_runner_round_trips_quoted_values() -> anyhow::Result<()> {
    // The platform shell parses the rendered line, so quoting must be
    // consumed by it rather than reaching the child literally.
    let args = compose_args([
        with_named_arg("--format", ["{{json .}}"]),
        with_arg(quoted("hello $PATH world")),
    ])
    .build();
    let response = CommandResponse::new("echo", args, |output, _| Ok(output.trim().to_string()));
    let runner = ShellRunner::with_defaults();
    assert_eq!(runner.run(&response)?, "--format {{json .}} hello $PATH world");
    Ok(())
}

#[test]
fn default_shell_runner_round_trips_escaped_spaces() -> anyhow::Result<()> {
    let args = compose_args([with_arg(escaped("hello world"))]).build();
    let response = CommandResponse::new("echo", args, |output, _| Ok(output.trim().to_string()));
    let runner = ShellRunner::with_defaults();
    assert_eq!(runner.run(&response)?, "hello world");
    Ok(())
}

#[test]
fn default_shell_runner_streams_through_heavy_stderr() {
    // Stderr larger than the pipe buffer must not stall the stdout reads.
    let script = "head -c 262144 /dev/zero | tr \"\\0\" e >&2; printf \"ok\\n\"";
    let args = compose_args([with_arg(escaped("-c")), with_arg(quoted(script))]).build();
    let response = StreamResponse::new("sh", args, |line, _| Ok(Some(line.to_string())));
    let lines: Vec<String> = ShellRunner::with_defaults()
        .stream(response)
        .unwrap()
        .map(|item| item.unwrap())
        .collect();
    assert_eq!(lines, ["ok"]);
}

#[test]
fn input_is_piped_to_stdin() -> anyhow::Result<()> {
    let response = CommandResponse::new("cat", Vec::new(), |output, _| Ok(output.to_string()));
    let runner = no_shell_runner(RunnerOptions::default());
    let output = runner.run_with_input(&response, b"line one\nline two\n")?;
    assert_eq!(output, "line one\nline two\n");
    Ok(())
}

#[test]
fn cancelled_token_fails_before_spawn() {
    let options = RunnerOptions {
        cancellation: CancellationToken::cancelled(),
        ..Default::default()
    };
    let response =
        CommandResponse::new("/nonexistent-program", Vec::new(), |_, _| Ok(()));
    let err = no_shell_runner(options).run(&response).unwrap_err();
    assert!(matches!(err, Error::Cancelled), "got {err:?}");
}

#[test]
fn timeout_kills_a_hung_child() {
    let options = RunnerOptions {
        timeout: Some(Duration::from_millis(200)),
        ..Default::default()
    };
    let args = compose_args([with_arg(escaped("30"))]).build();
    let response = CommandResponse::new("sleep", args, |_, _| Ok(()));
    let err = no_shell_runner(options).run(&response).unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
}

#[test]
fn nonzero_exit_surfaces_stderr() {
    let args = compose_args([
        with_arg(escaped("-c")),
        with_arg(quoted("echo boom >&2; exit 3")),
    ])
    .build();
    let response = CommandResponse::new("sh", args, |_, _| Ok(()));
    let err = no_shell_runner(RunnerOptions::default()).run(&response).unwrap_err();
    match err {
        Error::ProcessExit { code, stderr, .. } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected process exit, got {other:?}"),
    }
}

#[test]
fn stream_parses_line_by_line_and_skips_unparsed_lines() {
    let args = compose_args([
        with_arg(escaped("-c")),
        with_arg(quoted("printf 'one\\nskip-me\\ntwo\\n'")),
    ])
    .build();
    let response = StreamResponse::new("sh", args, |line, _| {
        if line.starts_with("skip") {
            Ok(None)
        } else {
            Ok(Some(line.to_string()))
        }
    });
    let stream = no_shell_runner(RunnerOptions::default())
        .stream(response)
        .unwrap();
    let lines: Vec<String> = stream.map(|item| item.unwrap()).collect();
    assert_eq!(lines, ["one", "two"]);
}

#[test]
fn stream_reports_nonzero_exit_as_final_item() {
    let args = compose_args([
        with_arg(escaped("-c")),
        with_arg(quoted("echo partial; exit 7")),
    ])
    .build();
    let response = StreamResponse::new("sh", args, |line, _| Ok(Some(line.to_string())));
    let mut stream = no_shell_runner(RunnerOptions::default())
        .stream(response)
        .unwrap();
    assert_eq!(stream.next().unwrap().unwrap(), "partial");
    let last = stream.next().expect("exit status item");
    assert!(
        matches!(last, Err(Error::ProcessExit { code: Some(7), .. })),
        "got {last:?}"
    );
    assert!(stream.next().is_none());
}

#[test]
fn env_and_cwd_are_applied() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let options = RunnerOptions {
        cwd: Some(dir.path().to_path_buf()),
        env: vec![("CC_TEST_MARKER".to_string(), "present".to_string())],
        ..Default::default()
    };
    let args = compose_args([
        with_arg(escaped("-c")),
        with_arg(quoted("pwd; printf '%s\\n' \"$CC_TEST_MARKER\"")),
    ])
    .build();
    let response = CommandResponse::new("sh", args, |output, _| Ok(output.to_string()));
    let output = no_shell_runner(options).run(&response)?;
    let mut lines = output.lines();
    let cwd = lines.next().unwrap();
    assert!(
        cwd.ends_with(dir.path().file_name().unwrap().to_str().unwrap()),
        "unexpected cwd: {cwd}"
    );
    assert_eq!(lines.next(), Some("present"));
    Ok(())
}
