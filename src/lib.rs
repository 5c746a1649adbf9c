//! Uniform client for container runtime CLIs.
//!
//! Docker, Podman, Finch and nerdctl cover the same operations but disagree
//! on flags, output framing, and field shapes. This crate splits the problem
//! in three:
//!
//! - [`args`] and [`shell`]: injection-safe command lines. Arguments carry a
//!   quoting class and are rendered per target shell, so untrusted values
//!   (container names, paths, filter text) never reach a shell unescaped.
//! - [`exec`]: synchronous runners that spawn a described command, buffer or
//!   stream its output, honor cooperative cancellation, and optionally
//!   indirect through WSL.
//! - [`clients`]: per-runtime clients that build [`CommandResponse`] /
//!   [`StreamResponse`] descriptors pairing a command line with a parser
//!   that normalizes the runtime's output into the [`contracts::types`]
//!   schema.
//!
//! Descriptors are inert data: a client never executes anything, which keeps
//! the command shapes testable without a container runtime installed.
//!
//! ```no_run
//! use container_client::clients::{ContainerClient, DockerClient};
//! use container_client::contracts::options::ListContainersOptions;
//! use container_client::exec::ShellRunner;
//!
//! # fn main() -> container_client::Result<()> {
//! let client = DockerClient;
//! let runner = ShellRunner::with_defaults();
//! let response = client.list_containers(&ListContainersOptions {
//!     all: true,
//!     ..Default::default()
//! })?;
//! let containers = runner.run(&response)?;
//! # Ok(()) }
//! ```

pub mod args;
pub mod clients;
pub mod contracts;
pub mod error;
pub mod exec;
pub mod parse;
pub mod shell;

pub use contracts::response::{CommandResponse, StreamResponse};
pub use error::{Error, Result};
