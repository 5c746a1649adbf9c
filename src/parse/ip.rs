//! IP address cleanup for values runtimes print in port tables.

/// Strips the brackets IPv6 addresses carry in `[::1]:8080`-style output.
/// IPv4 addresses pass through; empty input is `None`.
pub fn normalize_ip_address(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    let value = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);
    Some(value.to_string())
}
