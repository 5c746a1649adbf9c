//! Prune output.
//!
//! Prune commands print one line per removed resource followed by a
//! `Total reclaimed space: <size>` summary. Which lines name a resource
//! differs per resource kind, so callers pass the matching regex; its first
//! capture group is the ID or name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::contracts::types::PruneResult;
use crate::parse::size::try_parse_size;

/// `deleted: sha256:<id>` lines from image prunes. `untagged:` lines name a
/// reference, not a deletion, and intentionally do not match.
pub static IMAGE_DELETED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^deleted:\s*(?:sha256:)?([0-9a-f]+)\s*$").unwrap());

/// Bare ID or name lines, as container/volume/network prunes print under
/// their `Deleted ...:` heading.
pub static BARE_RESOURCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_.-]*)$").unwrap());

static RECLAIMED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^total reclaimed space:\s*(.+)$").unwrap());

pub fn parse_prune_like_output(output: &str, resource_regex: &Regex) -> PruneResult {
    let mut result = PruneResult::default();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(captures) = RECLAIMED_RE.captures(line) {
            result.space_reclaimed = try_parse_size(captures.get(1).map(|m| m.as_str()));
        } else if let Some(captures) = resource_regex.captures(line) {
            if let Some(resource) = captures.get(1) {
                result.deleted.push(resource.as_str().to_string());
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_prune_output() {
        let output = "\
untagged: alpine:3.17
deleted: sha256:aaaa1111
deleted: sha256:bbbb2222
deleted: cccc3333

Total reclaimed space: 62.95MB
";
        let result = parse_prune_like_output(output, &IMAGE_DELETED_RE);
        assert_eq!(result.deleted, vec!["aaaa1111", "bbbb2222", "cccc3333"]);
        assert_eq!(result.space_reclaimed, Some(66_007_859));
    }

    #[test]
    fn bare_resource_lines_skip_headings() {
        let output = "\
Deleted Volumes:
vol-one
vol_two

Total reclaimed space: 0B
";
        let result = parse_prune_like_output(output, &BARE_RESOURCE_RE);
        assert_eq!(result.deleted, vec!["vol-one", "vol_two"]);
        assert_eq!(result.space_reclaimed, Some(0));
    }

    #[test]
    fn no_summary_line() {
        let result = parse_prune_like_output("deleted: sha256:ff00\n", &IMAGE_DELETED_RE);
        assert_eq!(result.deleted, vec!["ff00"]);
        assert_eq!(result.space_reclaimed, None);
    }
}
