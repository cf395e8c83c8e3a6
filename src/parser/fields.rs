//! Field-level helpers: numbers, record splitting and line handling.

use crate::config::NumberMode;
use crate::error::{MapError, Result};

/// Leading integer of `text`, like a lenient `parseInt`: optional sign,
/// then as many digits as there are. `None` if there are no digits or the
/// value does not fit.
fn leading_int(text: &str) -> Option<i32> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let len = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }
    let magnitude: i64 = digits[..len].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Parse an integer field.
///
/// A missing field reads as an empty one. In permissive mode anything
/// without a leading integer is the `None` sentinel; in strict mode it is
/// an error.
pub fn parse_int(field: &'static str, token: Option<&str>, mode: NumberMode) -> Result<Option<i32>> {
    let token = token.unwrap_or("");
    match mode {
        NumberMode::Permissive => Ok(leading_int(token)),
        NumberMode::Strict => token
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| MapError::InvalidNumber {
                field,
                value: token.to_string(),
            }),
    }
}

/// Parse an unsigned id. `None` in permissive mode when unreadable.
pub fn parse_id(text: &str, mode: NumberMode) -> Option<u32> {
    match mode {
        NumberMode::Permissive => {
            let start = text.find(|c: char| c.is_ascii_digit())?;
            let digits = &text[start..];
            let len = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..len].parse().ok()
        }
        NumberMode::Strict => {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            text.parse().ok()
        }
    }
}

/// Text of a CSV record chunk with leading whitespace removed. The end is
/// kept as is: it belongs to the message field, and number fields trim
/// themselves.
pub fn record_text(value: &str) -> &str {
    value.trim_start()
}

/// Split a record into at most `max` fields; the last field keeps any
/// further commas.
pub fn split_record(text: &str, max: usize) -> Vec<&str> {
    text.splitn(max, ',').collect()
}

/// Split off the first line. Returns the line (without `\r`), the rest and
/// the byte index where the rest starts.
pub fn split_first_line(text: &str) -> (&str, &str, usize) {
    match text.find('\n') {
        Some(i) => {
            let line = &text[..i];
            (line.strip_suffix('\r').unwrap_or(line), &text[i + 1..], i + 1)
        }
        None => (text, "", text.len()),
    }
}

/// Remove one leading line break.
pub fn strip_leading_line_break(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}

/// Text with leading spaces and tabs removed, but not line breaks.
pub fn trim_inline_start(text: &str) -> &str {
    text.trim_start_matches([' ', '\t'])
}
