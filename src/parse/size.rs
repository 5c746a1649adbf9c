//! Human-readable size strings ("62.95MB", "1.2 GiB") to byte counts.

use once_cell::sync::Lazy;
use regex::Regex;

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>[a-z]+)?$").unwrap());

fn multiplier(unit: &str) -> Option<f64> {
    match unit.to_ascii_lowercase().as_str() {
        "b" => Some(1.0),
        "kb" | "kib" | "k" => Some(1024.0),
        "mb" | "mib" | "m" => Some(1024.0 * 1024.0),
        "gb" | "gib" | "g" => Some(1024.0 * 1024.0 * 1024.0),
        "tb" | "tib" | "t" => Some(1024.0 * 1024.0 * 1024.0 * 1024.0),
        "pb" | "pib" | "p" => Some(1024.0_f64.powi(5)),
        _ => None,
    }
}

/// Best-effort size parsing. Absent, `n/a`, or unparseable input is `None`,
/// never zero; fractional values round to the nearest byte.
pub fn try_parse_size(value: Option<&str>) -> Option<u64> {
    let value = value?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("n/a") || value == "<none>" {
        return None;
    }
    let captures = SIZE_RE.captures(value)?;
    let num: f64 = captures.name("num")?.as_str().parse().ok()?;
    let mult = match captures.name("unit") {
        Some(unit) => multiplier(unit.as_str())?,
        None => 1.0,
    };
    Some((num * mult).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bytes() {
        assert_eq!(try_parse_size(Some("1024")), Some(1024));
        assert_eq!(try_parse_size(Some("0")), Some(0));
    }

    #[test]
    fn decimal_megabytes() {
        // 62.95 * 1048576, rounded
        assert_eq!(try_parse_size(Some("62.95MB")), Some(66_007_859));
    }

    #[test]
    fn spaced_units_and_case() {
        assert_eq!(try_parse_size(Some("1.5 KB")), Some(1536));
        assert_eq!(try_parse_size(Some("2 GiB")), Some(2 * 1024 * 1024 * 1024));
    }

    #[test]
    fn not_a_size() {
        assert_eq!(try_parse_size(None), None);
        assert_eq!(try_parse_size(Some("")), None);
        assert_eq!(try_parse_size(Some("N/A")), None);
        assert_eq!(try_parse_size(Some("lots")), None);
    }
}
