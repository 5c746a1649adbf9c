//! Child-process plumbing shared by the runners.
//!
//! Buffered runs poll the child with a short `wait-timeout` interval so that
//! cancellation and deadlines are honored without a reaper thread. Streaming
//! runs hand back a handle whose lines are read on demand.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use crate::error::{Error, Result};
use crate::exec::cancel::CancellationToken;

/// Poll interval for the buffered wait loop.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Some runtimes emit this noise on stderr when run without a tty; it is not
/// a diagnostic and is stripped before stderr is surfaced in errors.
const BOGUS_SCREEN_SIZE: &str = "screen size is bogus";

/// Everything a spawn needs besides the argv itself.
#[derive(Default)]
pub struct SpawnOptions {
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub cancellation: CancellationToken,
}

fn build_command(program: &str, argv: &[String], options: &SpawnOptions) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(argv);
    if let Some(dir) = &options.cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    cmd
}

fn spawn_error(program: &str, source: std::io::Error) -> Error {
    Error::Spawn {
        command: program.to_string(),
        source,
    }
}

/// Keep only stderr lines that carry signal.
pub(crate) fn filter_stderr(stderr: &str) -> String {
    stderr
        .lines()
        .filter(|line| !line.contains(BOGUS_SCREEN_SIZE))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

fn wait_polling(
    program: &str,
    child: &mut Child,
    options: &SpawnOptions,
) -> Result<std::process::ExitStatus> {
    let deadline = options.timeout.map(|t| Instant::now() + t);
    loop {
        if options.cancellation.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::Cancelled);
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout(options.timeout.unwrap_or(WAIT_POLL)));
            }
        }
        match child
            .wait_timeout(WAIT_POLL)
            .map_err(|e| spawn_error(program, e))?
        {
            Some(status) => return Ok(status),
            None => continue,
        }
    }
}

/// Run to completion, returning the full stdout. Non-zero exit becomes
/// [`Error::ProcessExit`] carrying the filtered stderr.
pub fn spawn_buffered(program: &str, argv: &[String], options: &SpawnOptions) -> Result<String> {
    spawn_buffered_with_input(program, argv, options, None)
}

/// Like [`spawn_buffered`], but writes `input` to the child's stdin first.
pub fn spawn_buffered_with_input(
    program: &str,
    argv: &[String],
    options: &SpawnOptions,
    input: Option<&[u8]>,
) -> Result<String> {
    if options.cancellation.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tracing::debug!(program, args = ?argv, "spawning");
    let mut cmd = build_command(program, argv, options);
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;

    if let Some(bytes) = input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(bytes)
                .map_err(|e| spawn_error(program, e))?;
            // dropping stdin closes the pipe so the child sees EOF
        }
    }

    // Drain the pipes on threads so a chatty child cannot fill a pipe and
    // deadlock against the wait loop.
    let stdout_handle = child.stdout.take().map(read_to_string_thread);
    let stderr_handle = child.stderr.take().map(read_to_string_thread);

    let status = wait_polling(program, &mut child, options)?;

    let stdout = join_reader(stdout_handle, program)?;
    let stderr = join_reader(stderr_handle, program)?;

    if !status.success() {
        return Err(Error::ProcessExit {
            command: program.to_string(),
            code: status.code(),
            signal: exit_signal(&status),
            stderr: filter_stderr(&stderr),
        });
    }
    Ok(stdout)
}

// Lossy conversion: `cp`-style commands emit tar streams that are not UTF-8,
// and a replacement character beats failing the whole run.
fn read_to_string_thread<R: Read + Send + 'static>(
    mut reader: R,
) -> std::thread::JoinHandle<std::io::Result<String>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join_reader(
    handle: Option<std::thread::JoinHandle<std::io::Result<String>>>,
    program: &str,
) -> Result<String> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(result) => result.map_err(|e| spawn_error(program, e)),
            Err(_) => Err(spawn_error(
                program,
                std::io::Error::other("output reader panicked"),
            )),
        },
        None => Ok(String::new()),
    }
}

/// A running child whose stdout is read line by line.
pub struct StreamingChild {
    program: String,
    child: Child,
    reader: BufReader<ChildStdout>,
    stderr: Option<std::thread::JoinHandle<std::io::Result<String>>>,
    cancellation: CancellationToken,
    reaped: bool,
}

/// Spawn for line-oriented consumption. stdout is buffered here; stderr is
/// drained on a thread so a chatty child cannot fill the pipe and stall the
/// stdout reads, and is surfaced when the stream is finished.
pub fn spawn_streaming(
    program: &str,
    argv: &[String],
    options: &SpawnOptions,
) -> Result<StreamingChild> {
    if options.cancellation.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tracing::debug!(program, args = ?argv, "spawning (streaming)");
    let mut cmd = build_command(program, argv, options);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| spawn_error(program, std::io::Error::other("stdout not captured")))?;
    let stderr = child.stderr.take().map(read_to_string_thread);
    Ok(StreamingChild {
        program: program.to_string(),
        child,
        reader: BufReader::new(stdout),
        stderr,
        cancellation: options.cancellation.clone(),
        reaped: false,
    })
}

impl StreamingChild {
    /// Next stdout line, without the trailing newline. `Ok(None)` on EOF.
    /// Cancellation kills the child and surfaces [`Error::Cancelled`].
    pub fn next_line(&mut self) -> Result<Option<String>> {
        if self.cancellation.is_cancelled() {
            self.kill_now();
            return Err(Error::Cancelled);
        }
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| spawn_error(&self.program, e))?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Terminate the child without inspecting its exit status.
    pub fn kill_now(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.reaped = true;
    }

    /// Reap the child after EOF, mapping a non-zero exit to
    /// [`Error::ProcessExit`].
    pub fn finish(mut self) -> Result<()> {
        self.reaped = true;
        let status = self
            .child
            .wait()
            .map_err(|e| spawn_error(&self.program, e))?;
        let stderr = join_reader(self.stderr.take(), &self.program)?;
        if !status.success() {
            return Err(Error::ProcessExit {
                command: self.program.clone(),
                code: status.code(),
                signal: exit_signal(&status),
                stderr: filter_stderr(&stderr),
            });
        }
        Ok(())
    }
}

/// A handle dropped mid-stream must not leak the child; anything reaped
/// through [`StreamingChild::finish`] or [`StreamingChild::kill_now`] is
/// left alone.
impl Drop for StreamingChild {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
