//! Cooperative cancellation.
//!
//! Cancellation is a capability that may come from different hosts; this is
//! the one local shape, with ready-made "never cancels" and "already
//! cancelled" values for defaults.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative cancellation token. Cloning shares the underlying flag.
///
/// The runner checks the token before spawning (failing fast without touching
/// the OS) and polls it while the child runs; streaming consumers check it
/// once per line.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh token that can later be cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that never cancels.
    pub fn none() -> Self {
        Self::default()
    }

    /// A token that is already cancelled.
    pub fn cancelled() -> Self {
        let token = Self::default();
        token.cancel();
        token
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn singletons() {
        assert!(!CancellationToken::none().is_cancelled());
        assert!(CancellationToken::cancelled().is_cancelled());
    }
}
