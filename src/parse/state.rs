//! Container state heuristics.
//!
//! Older runtimes omit the `State` column from list output, leaving only the
//! free-text `Status` line ("Up 2 hours", "Exited (0) 3 days ago"). When the
//! state is absent it is reconstructed by substring priority.

/// Normalizes `State`/`Status` into one of `running`, `exited`, `paused`,
/// `created`, or `unknown`.
pub fn normalize_container_state(state: Option<&str>, status: Option<&str>) -> String {
    if let Some(state) = state {
        let state = state.trim();
        if !state.is_empty() {
            return state.to_ascii_lowercase();
        }
    }
    let status = status.map(|s| s.to_ascii_lowercase()).unwrap_or_default();
    // Order matters: "Up 2 hours (Paused)" is paused, not running.
    if status.contains("paused") {
        "paused".to_string()
    } else if status.contains("exit") || status.contains("terminate") || status.contains("dead") {
        "exited".to_string()
    } else if status.contains("created") {
        "created".to_string()
    } else if status.contains("up") || status.contains("running") {
        "running".to_string()
    } else {
        "unknown".to_string()
    }
}
