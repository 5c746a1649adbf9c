//! Line-parsed iteration over a streaming child.

use crate::contracts::response::LineParseFn;
use crate::error::Result;
use crate::exec::spawn::StreamingChild;

/// Iterates the parsed records of a long-running command (`logs --follow`,
/// `events`, `stats --no-stream` loops).
///
/// In strict mode a malformed line ends the stream with its error; in lenient
/// mode the line is logged and skipped. When stdout reaches EOF the child is
/// reaped, and a non-zero exit surfaces as the final item.
pub struct CommandStream<T> {
    child: Option<StreamingChild>,
    parse_line: LineParseFn<T>,
    strict: bool,
}

impl<T> CommandStream<T> {
    pub(crate) fn new(child: StreamingChild, parse_line: LineParseFn<T>, strict: bool) -> Self {
        Self {
            child: Some(child),
            parse_line,
            strict,
        }
    }
}

impl<T> Iterator for CommandStream<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let child = self.child.as_mut()?;
            let line = match child.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    // EOF: reap and report exit status once.
                    let child = self.child.take()?;
                    return match child.finish() {
                        Ok(()) => None,
                        Err(e) => Some(Err(e)),
                    };
                }
                Err(e) => {
                    self.child = None;
                    return Some(Err(e));
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match (self.parse_line)(&line, self.strict) {
                Ok(Some(item)) => return Some(Ok(item)),
                Ok(None) => continue,
                Err(e) if self.strict => {
                    self.child = None;
                    return Some(Err(e));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed line");
                    continue;
                }
            }
        }
    }
}

impl<T> CommandStream<T> {
    /// Drain the rest of the stream, failing on the first error.
    pub fn collect_all(self) -> Result<Vec<T>> {
        self.collect()
    }

    /// Stop the stream early without treating the kill as an error.
    pub fn close(mut self) {
        if let Some(mut child) = self.child.take() {
            child.kill_now();
        }
    }
}
