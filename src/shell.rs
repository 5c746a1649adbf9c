//! Per-shell quoting strategies.
//!
//! Builders emit quote classes; this is the single layer that decides how a
//! class is realized for a given shell. Centralizing the rules here is what
//! keeps shell-injection handling out of the dozens of command builders.

use crate::args::{Arg, ArgQuoting, CommandLineArgs};

/// The interpreter a quoted command line is handed to as a single string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub program: String,
    pub command_flag: String,
}

impl ShellInvocation {
    fn new(program: &str, command_flag: &str) -> Self {
        ShellInvocation {
            program: program.to_string(),
            command_flag: command_flag.to_string(),
        }
    }
}

/// Applies quoting rules for a specific target shell.
pub trait Shell: Send + Sync {
    /// Render each token according to its quote class.
    fn quote(&self, args: &CommandLineArgs) -> Vec<String>;

    /// How this shell is invoked to interpret a rendered command line.
    /// `None` means the tokens are passed to the program as direct argv and
    /// no shell ever parses them.
    fn invocation(&self) -> Option<ShellInvocation> {
        None
    }

    /// Apply shell-specific escaping to a Go-template `--format` payload.
    fn go_template_quoted(&self, value: &str, quoting: ArgQuoting) -> Arg {
        Arg::new(value, quoting)
    }

    /// Resolve template-flagged tokens with [`Shell::go_template_quoted`],
    /// then quote the full list. Runners call this rather than
    /// [`Shell::quote`] directly.
    fn render(&self, args: &CommandLineArgs) -> Vec<String> {
        let resolved: CommandLineArgs = args
            .iter()
            .map(|arg| {
                if arg.go_template {
                    self.go_template_quoted(&arg.value, arg.quoting)
                } else {
                    arg.clone()
                }
            })
            .collect();
        self.quote(&resolved)
    }
}

/// A token already wrapped in matching single or double quotes is passed
/// through unchanged; the caller asserts it is pre-quoted.
fn is_pre_quoted(value: &str) -> bool {
    let bytes = value.as_bytes();
    value.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
}

fn escape_chars(value: &str, specials: &[char], prefix: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if specials.contains(&c) {
            out.push(prefix);
        }
        out.push(c);
    }
    out
}

/// Quoting rules for bash/zsh (and POSIX sh).
pub struct Bash;

impl Shell for Bash {
    fn quote(&self, args: &CommandLineArgs) -> Vec<String> {
        args.iter()
            .map(|arg| {
                if is_pre_quoted(&arg.value) {
                    return arg.value.clone();
                }
                match arg.quoting {
                    ArgQuoting::Escape => escape_chars(&arg.value, &[' ', '"', '\''], '\\'),
                    ArgQuoting::Weak => format!("\"{}\"", escape_chars(&arg.value, &['"'], '\\')),
                    ArgQuoting::Strong => {
                        format!("'{}'", escape_chars(&arg.value, &['\''], '\\'))
                    }
                }
            })
            .collect()
    }

    fn invocation(&self) -> Option<ShellInvocation> {
        Some(ShellInvocation::new("/bin/sh", "-c"))
    }
}

/// Quoting rules for PowerShell.
pub struct Powershell;

impl Shell for Powershell {
    fn quote(&self, args: &CommandLineArgs) -> Vec<String> {
        args.iter()
            .map(|arg| {
                if is_pre_quoted(&arg.value) {
                    return arg.value.clone();
                }
                match arg.quoting {
                    ArgQuoting::Escape => {
                        escape_chars(&arg.value, &[' ', '"', '\'', '(', ')'], '`')
                    }
                    ArgQuoting::Weak => format!("\"{}\"", escape_chars(&arg.value, &['"'], '`')),
                    ArgQuoting::Strong => {
                        format!("'{}'", escape_chars(&arg.value, &['\''], '`'))
                    }
                }
            })
            .collect()
    }

    fn invocation(&self) -> Option<ShellInvocation> {
        Some(ShellInvocation::new("powershell", "-Command"))
    }

    fn go_template_quoted(&self, value: &str, quoting: ArgQuoting) -> Arg {
        match quoting {
            ArgQuoting::Escape => Arg::new(value, quoting),
            // Embedded double quotes must be backslash-escaped inside a
            // quoted Go template payload on PowerShell.
            ArgQuoting::Weak | ArgQuoting::Strong => {
                Arg::new(escape_chars(value, &['"'], '\\'), quoting)
            }
        }
    }
}

/// Quoting rules for cmd.exe, which has no single-quote semantics: `Strong`
/// is rendered with double quotes instead.
pub struct Cmd;

impl Shell for Cmd {
    fn quote(&self, args: &CommandLineArgs) -> Vec<String> {
        const SPECIALS: &[char] = &[' ', '"', '^', '&', '\\', '<', '>', '|'];
        args.iter()
            .map(|arg| {
                if is_pre_quoted(&arg.value) {
                    return arg.value.clone();
                }
                match arg.quoting {
                    ArgQuoting::Escape | ArgQuoting::Weak => {
                        escape_chars(&arg.value, SPECIALS, '^')
                    }
                    ArgQuoting::Strong => {
                        format!("\"{}\"", escape_chars(&arg.value, &['"'], '\\'))
                    }
                }
            })
            .collect()
    }

    fn invocation(&self) -> Option<ShellInvocation> {
        Some(ShellInvocation::new("cmd", "/C"))
    }
}

/// Pass-through strategy for direct argv invocation (no shell). Escapes
/// nothing, but still honors the Windows argv convention where values
/// containing spaces or quotes must be double-quoted.
pub struct NoShell {
    windows: bool,
}

impl NoShell {
    pub fn new() -> Self {
        NoShell {
            windows: cfg!(windows),
        }
    }

    pub fn for_windows(windows: bool) -> Self {
        NoShell { windows }
    }
}

impl Default for NoShell {
    fn default() -> Self {
        NoShell::new()
    }
}

impl Shell for NoShell {
    fn quote(&self, args: &CommandLineArgs) -> Vec<String> {
        args.iter()
            .map(|arg| {
                if self.windows && arg.value.contains([' ', '"']) {
                    format!("\"{}\"", escape_chars(&arg.value, &['"'], '\\'))
                } else {
                    arg.value.clone()
                }
            })
            .collect()
    }
}

/// The platform-default shell: cmd on Windows, bash elsewhere.
pub fn default_shell() -> Box<dyn Shell> {
    if cfg!(windows) {
        Box::new(Cmd)
    } else {
        Box::new(Bash)
    }
}
