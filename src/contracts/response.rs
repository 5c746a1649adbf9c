//! The command/parse contract.
//!
//! A client never spawns anything. It produces a [`CommandResponse`]: the
//! program to invoke, the quoting-annotated argument list, and a parser that
//! turns the eventual stdout into the typed result. Any runner can execute
//! it, locally or through an indirection layer, and feed the output back.

use std::fmt;

use crate::args::CommandLineArgs;
use crate::error::Result;

/// Parses complete stdout into `T`. The `strict` flag selects whether a
/// malformed record aborts the parse or is dropped.
pub type ParseFn<T> = Box<dyn Fn(&str, bool) -> Result<T> + Send + Sync>;

/// Parses one stdout line. `Ok(None)` means the line carries no record and
/// the stream should move on.
pub type LineParseFn<T> = Box<dyn Fn(&str, bool) -> Result<Option<T>> + Send + Sync>;

/// A fully described buffered command: pure data plus a parse function.
pub struct CommandResponse<T> {
    pub command: String,
    pub args: CommandLineArgs,
    pub parse: ParseFn<T>,
}

impl<T> CommandResponse<T> {
    pub fn new(
        command: impl Into<String>,
        args: CommandLineArgs,
        parse: impl Fn(&str, bool) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            parse: Box::new(parse),
        }
    }
}

impl<T> fmt::Debug for CommandResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResponse")
            .field("command", &self.command)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// A fully described streaming command: parsed one line at a time.
pub struct StreamResponse<T> {
    pub command: String,
    pub args: CommandLineArgs,
    pub parse_line: LineParseFn<T>,
}

impl<T> StreamResponse<T> {
    pub fn new(
        command: impl Into<String>,
        args: CommandLineArgs,
        parse_line: impl Fn(&str, bool) -> Result<Option<T>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            parse_line: Box::new(parse_line),
        }
    }
}

impl<T> fmt::Debug for StreamResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResponse")
            .field("command", &self.command)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
