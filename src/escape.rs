//! Escaping of the two metacharacters that cannot appear raw in message
//! fields: `,` separates record fields and `#` introduces chunks.

const ESCAPES: [(&str, &str); 2] = [(",", "[、]"), ("#", "[#]")];

/// Replace `,` with `[、]` and `#` with `[#]`.
pub fn escape_meta_chars(input: &str) -> String {
    ESCAPES
        .iter()
        .fold(input.to_string(), |s, (raw, escaped)| s.replace(raw, escaped))
}

/// Inverse of [`escape_meta_chars`].
pub fn unescape_meta_chars(input: &str) -> String {
    ESCAPES
        .iter()
        .fold(input.to_string(), |s, (raw, escaped)| s.replace(escaped, raw))
}
