//! nerdctl CLI client.

use crate::clients::nerdctl_like::{NerdctlLikeClient, NerdctlRuntime};

#[derive(Debug, Clone, Copy, Default)]
pub struct Nerdctl;

impl NerdctlRuntime for Nerdctl {
    fn command_name(&self) -> &str {
        "nerdctl"
    }

    fn display_name(&self) -> &str {
        "nerdctl"
    }
}

pub type NerdctlClient = NerdctlLikeClient<Nerdctl>;
