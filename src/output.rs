//! Terminal output formatting for the mapchunk CLI.
//!
//! Provides Cargo-style status output with right-aligned coloured verbs.
//! All status output goes to stderr; stdout is reserved for map text and
//! JSON.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::diagnostics::{Diagnostic, Severity};
use crate::error::MapError;
use crate::parser::offset_to_location;

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Prints Cargo-style status lines to stderr with optional ANSI colours.
/// Colour is enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// A printer that never colours its output.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "    Checking maps/town.map"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a string as cyan (for paths).
    pub fn cyan(&self, text: &str) -> String {
        if self.color {
            format!("{CYAN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Print a parser diagnostic for `path`, with its line and column in
    /// `source`.
    pub fn diagnostic(&self, path: &Path, source: &str, diagnostic: &Diagnostic) {
        let location = offset_to_location(source, diagnostic.offset);
        let message = format!(
            "{}:{}: {} {}",
            self.cyan(&display_path(path)),
            location,
            diagnostic.message,
            self.dim(&format!("[{}]", diagnostic.code))
        );
        match diagnostic.severity {
            Severity::Warning => self.warning("warning", &message),
            Severity::Info => self.info("note", &message),
        }
        if let Some(help) = &diagnostic.help {
            self.info("help", &self.dim(help));
        }
    }

    /// Print a fatal parse error for `path`.
    pub fn parse_error(&self, path: &Path, source: &str, err: &MapError) {
        let location = match err.offset() {
            Some(offset) => format!(":{}", offset_to_location(source, offset)),
            None => String::new(),
        };
        self.error(
            "error",
            &format!("{}{}: {}", self.cyan(&display_path(path)), location, error_chain(err)),
        );
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// An error and all of its causes on one line.
pub fn error_chain(err: &MapError) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Pluralize a count: `plural(1, "map", "maps")` → "1 map".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_singular() {
        assert_eq!(plural(1, "map", "maps"), "1 map");
    }

    #[test]
    fn test_plural_zero() {
        assert_eq!(plural(0, "warning", "warnings"), "0 warnings");
    }

    #[test]
    fn test_display_path_absolute() {
        // An absolute path outside cwd should stay absolute
        let p = Path::new("/nonexistent/path/to/town.map");
        assert_eq!(display_path(p), "/nonexistent/path/to/town.map");
    }

    #[test]
    fn test_plain_printer_does_not_colour() {
        let printer = Printer::plain();
        assert_eq!(printer.cyan("town.map"), "town.map");
        assert_eq!(printer.dim("help"), "help");
    }

    #[test]
    fn test_error_chain() {
        let err = MapError::InvalidNumber {
            field: "speed",
            value: "fast".to_string(),
        }
        .in_chunk("HUMAN", 20);

        assert_eq!(
            error_chain(&err),
            "In chunk 'HUMAN' at byte 20: Invalid number for speed: 'fast'"
        );
    }
}
