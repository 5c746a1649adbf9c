//! Command-line builder: an ordered, quoting-annotated argument list composed
//! from small argument-emitting functions.
//!
//! Invariants:
//! - Token order is significant and is solely a function of composition order.
//! - Builders emit *intent* (a quote class per token); only the shell layer
//!   decides how that intent is rendered for a given target shell.
//! - Building a command line never spawns anything.

/// How a single argument should be quoted by the shell layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgQuoting {
    /// Escape individual special characters (the default for normal tokens).
    Escape,
    /// Wrap the whole value in double quotes (shell-expandable).
    Weak,
    /// Wrap the whole value in single quotes (no expansion).
    Strong,
}

/// One token of a command line: the raw value plus its quote class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub value: String,
    pub quoting: ArgQuoting,
    /// Marks a Go-template payload the shell layer may re-escape before the
    /// quoting pass.
    pub go_template: bool,
}

impl Arg {
    pub fn new(value: impl Into<String>, quoting: ArgQuoting) -> Self {
        Arg {
            value: value.into(),
            quoting,
            go_template: false,
        }
    }
}

/// An ordered sequence of quoting-annotated tokens.
pub type CommandLineArgs = Vec<Arg>;

/// A composable argument-emitting transform. Each curry function appends zero
/// or more tokens to the accumulated list; composition is associative and
/// order-preserving.
pub type ArgFn = Box<dyn Fn(CommandLineArgs) -> CommandLineArgs + Send + Sync>;

/// Anything that can become an optional argument token. Empty values become
/// `None` so that optional flags can be "not applied" by passing them along.
pub trait IntoArg {
    fn into_arg(self) -> Option<Arg>;
}

impl IntoArg for Arg {
    fn into_arg(self) -> Option<Arg> {
        if self.value.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl IntoArg for String {
    fn into_arg(self) -> Option<Arg> {
        escaped(self)
    }
}

impl IntoArg for &str {
    fn into_arg(self) -> Option<Arg> {
        escaped(self)
    }
}

impl<T: IntoArg> IntoArg for Option<T> {
    fn into_arg(self) -> Option<Arg> {
        self.and_then(IntoArg::into_arg)
    }
}

/// Wrap a value as an `Escape`-quoted token, or `None` if the value is empty.
pub fn escaped(value: impl Into<String>) -> Option<Arg> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(Arg::new(value, ArgQuoting::Escape))
    }
}

/// Wrap a value as a `Strong`-quoted token, or `None` if the value is empty.
/// Used for filesystem paths, which always force strong quoting.
pub fn quoted(value: impl Into<String>) -> Option<Arg> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(Arg::new(value, ArgQuoting::Strong))
    }
}

/// Wrap a value as a `Weak`-quoted token, or `None` if the value is empty.
pub fn inner_quoted(value: impl Into<String>) -> Option<Arg> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(Arg::new(value, ArgQuoting::Weak))
    }
}

/// Wrap a Go-template `--format` payload as a `Strong`-quoted token that the
/// shell layer re-escapes per shell, or `None` if the value is empty.
pub fn go_template(value: impl Into<String>) -> Option<Arg> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(Arg {
            value,
            quoting: ArgQuoting::Strong,
            go_template: true,
        })
    }
}

/// Append each defined, non-empty value as a positional token. `None` and
/// empty values are skipped silently.
pub fn with_arg<I>(values: I) -> ArgFn
where
    I: IntoIterator,
    I::Item: IntoArg,
{
    let args: Vec<Arg> = values.into_iter().filter_map(IntoArg::into_arg).collect();
    Box::new(move |mut line| {
        line.extend(args.iter().cloned());
        line
    })
}

/// Options for [`with_named_arg_opts`].
#[derive(Debug, Clone, Copy)]
pub struct NamedArgOpts {
    /// Render as a single `--name=value` token instead of two tokens.
    pub assign_value: bool,
    /// Strong-quote the value (the default); otherwise escape it.
    pub quote: bool,
}

impl Default for NamedArgOpts {
    fn default() -> Self {
        NamedArgOpts {
            assign_value: false,
            quote: true,
        }
    }
}

/// For each value, append `name` followed by the value as two tokens (or one
/// `name=value` token with `assign_value`). Empty input contributes nothing.
pub fn with_named_arg<I>(name: &str, values: I) -> ArgFn
where
    I: IntoIterator,
    I::Item: IntoArg,
{
    with_named_arg_opts(name, values, NamedArgOpts::default())
}

pub fn with_named_arg_opts<I>(name: &str, values: I, opts: NamedArgOpts) -> ArgFn
where
    I: IntoIterator,
    I::Item: IntoArg,
{
    let name = name.to_string();
    let values: Vec<Arg> = values
        .into_iter()
        .filter_map(IntoArg::into_arg)
        .map(|arg| {
            if opts.quote {
                Arg {
                    value: arg.value,
                    quoting: ArgQuoting::Strong,
                    go_template: arg.go_template,
                }
            } else {
                arg
            }
        })
        .collect();
    Box::new(move |mut line| {
        for value in &values {
            if opts.assign_value {
                line.push(Arg {
                    value: format!("{}={}", name, value.value),
                    quoting: value.quoting,
                    go_template: value.go_template,
                });
            } else {
                line.push(Arg::new(name.clone(), ArgQuoting::Escape));
                line.push(value.clone());
            }
        }
        line
    })
}

/// Append `name` alone iff `condition` is true.
pub fn with_flag_arg(name: &str, condition: bool) -> ArgFn {
    let name = name.to_string();
    Box::new(move |mut line| {
        if condition {
            line.push(Arg::new(name.clone(), ArgQuoting::Escape));
        }
        line
    })
}

/// Append a caller-supplied free-form string as a single `Weak`-quoted token.
/// Internal whitespace is preserved as one argument; the value is never
/// re-split or escaped beyond minimal shell safety.
pub fn with_verbatim_arg(value: Option<String>) -> ArgFn {
    let arg = value.filter(|v| !v.is_empty());
    Box::new(move |mut line| {
        if let Some(ref v) = arg {
            line.push(Arg::new(v.clone(), ArgQuoting::Weak));
        }
        line
    })
}

/// A composed argument description: built once, rendered lazily.
pub struct ComposedArgs {
    fns: Vec<ArgFn>,
}

impl ComposedArgs {
    /// Fold the curry functions left-to-right starting from an empty list.
    pub fn build(&self) -> CommandLineArgs {
        self.fns.iter().fold(Vec::new(), |acc, f| f(acc))
    }
}

/// Chain argument-emitting functions into a lazily-rendered description,
/// so call sites can assemble a command once and tests can assert on the
/// composed description without executing anything.
pub fn compose_args<I>(fns: I) -> ComposedArgs
where
    I: IntoIterator<Item = ArgFn>,
{
    ComposedArgs {
        fns: fns.into_iter().collect(),
    }
}
