//! Image reference parsing.
//!
//! References follow `[registry/]path[:tag][@digest]`. The registry segment
//! is only treated as a registry when it could not be a repository path
//! component: `localhost`, a dotted DNS name (optionally with a port), or a
//! bare `host:port`. `<none>` placeholders, which runtimes print for
//! dangling images, normalize to `None`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::contracts::types::ImageNameInfo;
use crate::error::{Error, Result};

const NONE_SENTINEL: &str = "<none>";

static REGISTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:localhost(?::\d+)?|[a-z0-9][a-z0-9-]*(?:\.[a-z0-9][a-z0-9-]*)+(?::\d+)?|[a-z0-9][a-z0-9-]*:\d+)$",
    )
    .unwrap()
});

// Lowercase alphanumerics joined by single dots, single or double
// underscores, or runs of dashes. No leading or trailing separator.
static PATH_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:(?:\.|_{1,2}|-+)[a-z0-9]+)*$").unwrap());

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]{0,127}$").unwrap());

fn invalid(name: &str) -> Error {
    Error::InvalidImageName(name.to_string())
}

/// Splits a repository string (no tag, no digest) into registry and image
/// path, validating both.
pub fn parse_image_repository(repository: &str) -> Result<(Option<String>, Option<String>)> {
    if repository.is_empty() || repository == NONE_SENTINEL {
        return Ok((None, None));
    }
    let (registry, path) = match repository.split_once('/') {
        Some((first, rest)) if REGISTRY_RE.is_match(first) => {
            (Some(first.to_string()), rest.to_string())
        }
        _ => (None, repository.to_string()),
    };
    if path.is_empty() {
        return Err(invalid(repository));
    }
    for segment in path.split('/') {
        if !PATH_SEGMENT_RE.is_match(segment) {
            return Err(invalid(repository));
        }
    }
    Ok((registry, Some(path)))
}

/// Parses a full image reference as printed by a runtime.
///
/// `None` and `<none>`-only inputs yield an [`ImageNameInfo`] whose parts
/// are all `None` but whose `original_name` preserves the input. Malformed
/// references are rejected with [`Error::InvalidImageName`].
pub fn parse_docker_like_image_name(original: Option<&str>) -> Result<ImageNameInfo> {
    let Some(original) = original else {
        return Ok(ImageNameInfo::default());
    };
    let mut info = ImageNameInfo {
        original_name: Some(original.to_string()),
        ..Default::default()
    };
    if original.is_empty() || original == NONE_SENTINEL {
        return Ok(info);
    }

    // Digest first: everything after '@' is opaque to the rest of the
    // grammar (it contains a ':' of its own).
    let (name, digest) = match original.split_once('@') {
        Some((name, digest)) => (name, Some(digest.to_string())),
        None => (original, None),
    };
    info.digest = digest;

    // The tag separator is a ':' after the last '/'.
    let (repository, tag) = match name.rfind(':') {
        Some(idx) if idx > name.rfind('/').map_or(0, |s| s) => {
            (&name[..idx], Some(&name[idx + 1..]))
        }
        _ => (name, None),
    };
    match tag {
        Some(NONE_SENTINEL) | None => {}
        Some(tag) if TAG_RE.is_match(tag) => info.tag = Some(tag.to_string()),
        Some(_) => return Err(invalid(original)),
    }

    let (registry, image) = parse_image_repository(repository)?;
    info.registry = registry;
    info.image = image;
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_image() {
        let info = parse_docker_like_image_name(Some("alpine")).unwrap();
        assert_eq!(info.image.as_deref(), Some("alpine"));
        assert_eq!(info.registry, None);
        assert_eq!(info.tag, None);
        assert_eq!(info.original_name.as_deref(), Some("alpine"));
    }

    #[test]
    fn registry_port_tag_and_digest() {
        let info = parse_docker_like_image_name(Some(
            "localhost:5000/library/alpine:3.19@sha256:0123abcd",
        ))
        .unwrap();
        assert_eq!(info.registry.as_deref(), Some("localhost:5000"));
        assert_eq!(info.image.as_deref(), Some("library/alpine"));
        assert_eq!(info.tag.as_deref(), Some("3.19"));
        assert_eq!(info.digest.as_deref(), Some("sha256:0123abcd"));
    }

    #[test]
    fn dotted_registry() {
        let info = parse_docker_like_image_name(Some("ghcr.io/owner/tool:v1")).unwrap();
        assert_eq!(info.registry.as_deref(), Some("ghcr.io"));
        assert_eq!(info.image.as_deref(), Some("owner/tool"));
    }

    #[test]
    fn first_segment_without_dot_is_part_of_the_path() {
        let info = parse_docker_like_image_name(Some("library/alpine")).unwrap();
        assert_eq!(info.registry, None);
        assert_eq!(info.image.as_deref(), Some("library/alpine"));
    }

    #[test]
    fn none_sentinels() {
        let info = parse_docker_like_image_name(Some("<none>")).unwrap();
        assert_eq!(info.image, None);
        assert_eq!(info.original_name.as_deref(), Some("<none>"));

        let info = parse_docker_like_image_name(Some("<none>:<none>")).unwrap();
        assert_eq!(info.image, None);
        assert_eq!(info.tag, None);
    }

    #[test]
    fn rejects_uppercase_path() {
        assert!(parse_docker_like_image_name(Some("MyImage")).is_err());
        assert!(parse_docker_like_image_name(Some("repo/SubPath:1")).is_err());
    }

    #[test]
    fn rejects_edge_underscores() {
        assert!(parse_docker_like_image_name(Some("_image")).is_err());
        assert!(parse_docker_like_image_name(Some("image_")).is_err());
        assert!(parse_docker_like_image_name(Some("my__image")).is_ok());
        assert!(parse_docker_like_image_name(Some("my.image-x")).is_ok());
    }

    #[test]
    fn rejects_bad_tag() {
        assert!(parse_docker_like_image_name(Some("alpine:.bad")).is_err());
    }

    #[test]
    fn missing_input() {
        let info = parse_docker_like_image_name(None).unwrap();
        assert_eq!(info, ImageNameInfo::default());
    }
}
