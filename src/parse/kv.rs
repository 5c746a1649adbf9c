//! Key/value text: label strings and environment arrays.

use crate::contracts::types::Labels;

/// Parses the comma-joined `k=v` label string from list output. Entries
/// without a `=` map to an empty value.
pub fn parse_label_string(labels: Option<&str>) -> Labels {
    let mut result = Labels::new();
    let Some(labels) = labels else {
        return result;
    };
    for entry in labels.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, value)) => result.insert(key.to_string(), value.to_string()),
            None => result.insert(entry.to_string(), String::new()),
        };
    }
    result
}

/// Parses `KEY=value` entries, splitting on the first `=` only so values may
/// themselves contain `=`.
pub fn parse_env_entries<S: AsRef<str>>(entries: &[S]) -> Labels {
    let mut result = Labels::new();
    for entry in entries {
        if let Some((key, value)) = entry.as_ref().split_once('=') {
            result.insert(key.to_string(), value.to_string());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_comma_split() {
        let labels = parse_label_string(Some("a=1,b=2,flag"));
        assert_eq!(labels.get("a").map(String::as_str), Some("1"));
        assert_eq!(labels.get("b").map(String::as_str), Some("2"));
        assert_eq!(labels.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn empty_label_string() {
        assert!(parse_label_string(None).is_empty());
        assert!(parse_label_string(Some("")).is_empty());
    }

    #[test]
    fn env_splits_on_first_equals_only() {
        let env = parse_env_entries(&["PATH=/usr/bin:/bin", "EQ=a=b=c"]);
        assert_eq!(env.get("PATH").map(String::as_str), Some("/usr/bin:/bin"));
        assert_eq!(env.get("EQ").map(String::as_str), Some("a=b=c"));
    }
}
