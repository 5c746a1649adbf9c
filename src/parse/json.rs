//! JSON framings shared by every list/inspect parser.
//!
//! Docker prints one JSON object per line; Podman prints a single JSON
//! array; Finch and nerdctl print either depending on subcommand and
//! version. Record-level failures honor the strict flag: strict aborts the
//! whole parse, lenient drops the record and keeps going.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// One document, strict by nature: there is no record boundary to recover
/// at.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text.trim()).map_err(Error::from)
}

fn record_from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(Error::from)
}

/// Newline-delimited JSON objects.
pub fn parse_ndjson<T: DeserializeOwned>(output: &str, strict: bool) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(item) => items.push(item),
            Err(e) if strict => return Err(Error::from(e)),
            Err(e) => tracing::debug!(error = %e, "dropping malformed record"),
        }
    }
    Ok(items)
}

/// A single JSON array of records. The outer framing must parse even in
/// lenient mode; only per-record conversion honors the strict flag.
pub fn parse_json_array<T: DeserializeOwned>(output: &str, strict: bool) -> Result<Vec<T>> {
    let output = output.trim();
    if output.is_empty() {
        return Ok(Vec::new());
    }
    let values: Vec<serde_json::Value> = serde_json::from_str(output)?;
    let mut items = Vec::new();
    for value in values {
        match record_from_value(value) {
            Ok(item) => items.push(item),
            Err(e) if strict => return Err(e),
            Err(e) => tracing::debug!(error = %e, "dropping malformed record"),
        }
    }
    Ok(items)
}

/// Tolerant framing for runtimes that switch between the two shapes: a
/// leading `[` selects array framing, anything else line framing.
pub fn parse_array_or_lines<T: DeserializeOwned>(output: &str, strict: bool) -> Result<Vec<T>> {
    if output.trim_start().starts_with('[') {
        parse_json_array(output, strict)
    } else {
        parse_ndjson(output, strict)
    }
}

/// Array-or-lines framing that hands each record's own JSON text to the
/// normalizer, for item types that keep a raw passthrough.
pub fn parse_with_raw<R, T, F>(output: &str, strict: bool, normalize: F) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    F: Fn(R, &str) -> Result<T>,
{
    let output = output.trim();
    if output.is_empty() {
        return Ok(Vec::new());
    }
    let values: Vec<serde_json::Value> = if output.starts_with('[') {
        serde_json::from_str(output)?
    } else {
        let mut values = Vec::new();
        for line in output.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(value) => values.push(value),
                Err(e) if strict => return Err(Error::from(e)),
                Err(e) => tracing::debug!(error = %e, "dropping malformed record"),
            }
        }
        values
    };
    let mut items = Vec::new();
    for value in values {
        let raw = value.to_string();
        let result = record_from_value(value).and_then(|record| normalize(record, &raw));
        match result {
            Ok(item) => items.push(item),
            Err(e) if strict => return Err(e),
            Err(e) => tracing::debug!(error = %e, "dropping malformed record"),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Rec {
        id: String,
    }

    const ONE_BAD_LINE: &str = "{\"id\":\"a\"}\nnot json\n{\"id\":\"b\"}\n";

    #[test]
    fn lenient_drops_the_bad_line() {
        let items: Vec<Rec> = parse_ndjson(ONE_BAD_LINE, false).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, "b");
    }

    #[test]
    fn strict_aborts_on_the_bad_line() {
        assert!(parse_ndjson::<Rec>(ONE_BAD_LINE, true).is_err());
    }

    #[test]
    fn array_framing_with_bad_record() {
        let output = "[{\"id\":\"a\"},{\"wrong\":1},{\"id\":\"b\"}]";
        let lenient: Vec<Rec> = parse_json_array(output, false).unwrap();
        assert_eq!(lenient.len(), 2);
        assert!(parse_json_array::<Rec>(output, true).is_err());
    }

    #[test]
    fn broken_array_framing_fails_even_lenient() {
        assert!(parse_json_array::<Rec>("[{\"id\":\"a\"}", false).is_err());
    }

    #[test]
    fn array_or_lines_detects_framing() {
        let arr: Vec<Rec> = parse_array_or_lines("  [{\"id\":\"a\"}]", false).unwrap();
        assert_eq!(arr.len(), 1);
        let lines: Vec<Rec> = parse_array_or_lines("{\"id\":\"a\"}\n{\"id\":\"b\"}", false).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn empty_output_is_an_empty_list() {
        assert_eq!(parse_json_array::<Rec>("", true).unwrap().len(), 0);
        assert_eq!(parse_ndjson::<Rec>("\n\n", true).unwrap().len(), 0);
    }
}
