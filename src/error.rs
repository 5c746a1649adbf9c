//! Error taxonomy for command construction, execution, and output parsing.
//!
//! Cancellation is deliberately a distinct variant from process failure so
//! callers can special-case "user cancelled" without string matching.

use std::io;
use std::time::Duration;

/// Errors produced anywhere in the command pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The child process could not be started at all (binary missing,
    /// permissions, ...).
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child process ran but exited non-zero. Carries the captured
    /// stderr text (benign terminal-size warnings already filtered).
    #[error("`{command}` exited with {}: {stderr}", display_exit(.code, .signal))]
    ProcessExit {
        command: String,
        code: Option<i32>,
        signal: Option<i32>,
        stderr: String,
    },

    /// A cancellation token fired while the command was in flight.
    #[error("command cancelled")]
    Cancelled,

    /// The command did not finish within the configured timeout.
    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    /// A record in the command output could not be parsed/normalized.
    /// In non-strict mode these are swallowed per-record; in strict mode
    /// they propagate and abort the parse.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client/runtime combination does not implement this operation.
    /// Lets callers feature-detect rather than fail at runtime.
    #[error("command not supported: {0}")]
    NotSupported(String),

    /// An image reference did not match the image-name grammar.
    #[error("invalid image name: {0}")]
    InvalidImageName(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    /// True when the failure was caused by a cancellation token, as opposed
    /// to the process itself failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, Error::NotSupported(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

fn display_exit(code: &Option<i32>, signal: &Option<i32>) -> String {
    match (code, signal) {
        (Some(c), _) => format!("code {c}"),
        (None, Some(s)) => format!("signal {s}"),
        (None, None) => "unknown status".to_string(),
    }
}
