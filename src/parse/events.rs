//! containerd event topics.
//!
//! Finch and nerdctl surface raw containerd topics (`/tasks/exit`) instead
//! of Docker's type/action pairs. Known topics map onto the Docker
//! vocabulary; snapshot bookkeeping is dropped; anything else falls back to
//! the topic's own path segments so no event silently changes meaning.

use crate::contracts::types::EventType;

/// Maps a containerd topic to a normalized (type, action) pair.
/// `None` means the event carries no caller-visible meaning.
pub fn map_containerd_topic(topic: &str) -> Option<(EventType, String)> {
    let mapped = match topic {
        "/containers/create" => (EventType::Container, "create"),
        "/containers/update" => (EventType::Container, "update"),
        "/containers/delete" => (EventType::Container, "destroy"),
        "/tasks/create" => (EventType::Container, "create"),
        "/tasks/start" => (EventType::Container, "start"),
        "/tasks/oom" => (EventType::Container, "oom"),
        "/tasks/exit" => (EventType::Container, "stop"),
        "/tasks/delete" => (EventType::Container, "delete"),
        "/tasks/paused" => (EventType::Container, "pause"),
        "/tasks/resumed" => (EventType::Container, "unpause"),
        "/images/create" => (EventType::Image, "create"),
        "/images/update" => (EventType::Image, "update"),
        "/images/delete" => (EventType::Image, "delete"),
        _ => {
            if topic.starts_with("/snapshot/") {
                return None;
            }
            let mut segments = topic.trim_matches('/').splitn(2, '/');
            let category = segments.next().unwrap_or_default();
            let action = segments.next().unwrap_or_default();
            if category.is_empty() || action.is_empty() {
                return None;
            }
            // containerd categories are plural
            let event_type = match category {
                "containers" | "tasks" => EventType::Container,
                "images" => EventType::Image,
                "networks" => EventType::Network,
                "volumes" => EventType::Volume,
                other => EventType::Other(other.to_string()),
            };
            return Some((event_type, action.to_string()));
        }
    };
    Some((mapped.0, mapped.1.to_string()))
}
