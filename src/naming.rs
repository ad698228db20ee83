//! Terraform identifier helpers

/// Returned when a name has no usable characters left
pub const FALLBACK_IDENTIFIER: &str = "default_resource";

/// Map an arbitrary display name to a valid Terraform local name.
///
/// Lowercases, turns spaces into underscores and drops anything outside
/// `[a-zA-Z0-9_]`. A leading digit gets an `r_` prefix.
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .replace(' ', "_")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    match sanitized.chars().next() {
        None => FALLBACK_IDENTIFIER.to_string(),
        Some(first) if first.is_ascii_digit() => format!("r_{}", sanitized),
        Some(_) => sanitized,
    }
}

/// Escape a value for use inside an HCL double-quoted string
pub fn hcl_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            // `${` and `%{` would start a template sequence
            '$' | '%' if chars.peek() == Some(&'{') => {
                escaped.push(c);
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
