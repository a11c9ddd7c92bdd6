use std::collections::BTreeMap;

/// Key in `config-domain` holding documentation rather than a domain
pub const EXAMPLE_KEY: &str = "_example";

/// Flatten a selector block into a single line
///
/// `"selector:\n  key1: value1\n  key2: value2\n"` becomes `"key1=value1; key2=value2"`.
/// Anything not starting with a `selector:` line yields an empty string, and lines
/// without a `key: value` pair are skipped.
pub fn format_selector_for_print(selector: &str) -> String {
    let normalised = selector.trim().replace(':', "=");
    let mut parts = normalised.split('\n');
    match parts.next() {
        Some(first) if first.starts_with("selector=") => {}
        _ => return String::new(),
    }
    parts
        .filter(|p| p.contains('='))
        .map(|p| p.replace(' ', ""))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Custom domain rows from the `config-domain` data, sorted by domain
pub fn domain_rows(data: &BTreeMap<String, String>) -> Vec<(String, String)> {
    data.iter()
        .filter(|(k, _)| k.as_str() != EXAMPLE_KEY)
        .map(|(k, v)| (k.clone(), format_selector_for_print(v)))
        .collect()
}
