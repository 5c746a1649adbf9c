//! Go-template `--format` payloads.
//!
//! List commands are asked for JSON explicitly, one `{{ json .Field }}`
//! expression per field, so the parser sees a stable shape regardless of the
//! runtime's default columns. An override replaces the expression for a
//! field wholesale (Podman reports no `Platform`, so its clients pin it to
//! `"linux"`).

/// Builds `{"A":{{ json .A }},"B":{{ json .B }}}` for `properties`, with
/// per-field expression overrides.
pub fn go_template_json_format(properties: &[&str], overrides: &[(&str, &str)]) -> String {
    let fields: Vec<String> = properties
        .iter()
        .map(|property| {
            let expression = overrides
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, expression)| (*expression).to_string())
                .unwrap_or_else(|| format!("{{{{ json .{property} }}}}"));
            format!("\"{property}\":{expression}")
        })
        .collect();
    format!("{{{}}}", fields.join(","))
}
