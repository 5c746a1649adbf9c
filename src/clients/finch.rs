//! Finch CLI client.

use crate::clients::nerdctl_like::{NerdctlLikeClient, NerdctlRuntime};

#[derive(Debug, Clone, Copy, Default)]
pub struct Finch;

impl NerdctlRuntime for Finch {
    fn command_name(&self) -> &str {
        "finch"
    }

    fn display_name(&self) -> &str {
        "Finch"
    }
}

pub type FinchClient = NerdctlLikeClient<Finch>;
