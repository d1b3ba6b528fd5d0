//! Line break normalization and restoration.

use std::borrow::Cow;

use crate::config::EndOfLine;

/// Line separator of the platform the engine runs on.
pub const NATIVE_LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Replaces every `\r\n`, then every remaining `\r`, with `\n`.
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Picks the separator to write formatted output with.
///
/// Only the last line break of `original` is inspected. Text without any
/// `\n` uses `\r` if it contains one, and the platform separator otherwise.
pub fn determine_line_separator(original: &str) -> &'static str {
    match original.rfind('\n') {
        None if original.contains('\r') => "\r",
        None => NATIVE_LINE_SEPARATOR,
        Some(i) if i > 0 && original.as_bytes()[i - 1] == b'\r' => "\r\n",
        Some(_) => "\n",
    }
}

/// Converts normalized output back to the separator of `original`, or to
/// the configured one when `end_of_line` is set.
pub fn restore_line_breaks(
    normalized: &str,
    original: &str,
    end_of_line: Option<EndOfLine>,
) -> String {
    let separator = match end_of_line {
        Some(end_of_line) => end_of_line.separator(),
        None => determine_line_separator(original),
    };
    if separator == "\n" {
        normalized.to_string()
    } else {
        normalized.replace('\n', separator)
    }
}
