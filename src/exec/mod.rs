//! Command execution: cancellation, child plumbing, runners, and streams.

pub mod cancel;
pub mod runner;
pub mod spawn;
pub mod stream;

pub use cancel::CancellationToken;
pub use runner::{RunnerOptions, ShellRunner, WslRunner};
pub use spawn::{spawn_buffered, SpawnOptions};
pub use stream::CommandStream;
