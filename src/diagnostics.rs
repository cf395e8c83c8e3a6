//! Non-fatal findings collected while parsing.
//!
//! The parser never prints. Anything it recovers from (unknown chunk
//! names, unterminated chunks, unreadable records) is recorded here and
//! handed back next to the document.

use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Diagnostic codes emitted by the parser.
pub mod codes {
    pub const UNKNOWN_CHUNK: &str = "mapchunk::unknown-chunk";
    pub const UNKNOWN_COMMAND: &str = "mapchunk::unknown-command";
    pub const UNTERMINATED_CHUNK: &str = "mapchunk::unterminated-chunk";
    pub const MALFORMED_CHUNK: &str = "mapchunk::malformed-chunk";
    pub const OUT_OF_RANGE: &str = "mapchunk::out-of-range";
    pub const INVALID_RECORD: &str = "mapchunk::invalid-record";
    pub const INVALID_PHASE: &str = "mapchunk::invalid-phase";
}

/// A single parser diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Machine-readable code (one of [`codes`]).
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
    /// Byte offset into the parsed source.
    pub offset: usize,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(code: &'static str, message: impl Into<String>, offset: usize) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            help: None,
            offset,
        }
    }

    /// Create an informational diagnostic.
    pub fn info(code: &'static str, message: impl Into<String>, offset: usize) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            help: None,
            offset,
        }
    }

    /// Add help text to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Collects diagnostics during a parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn warning(&mut self, code: &'static str, message: impl Into<String>, offset: usize) {
        self.push(Diagnostic::warning(code, message, offset));
    }

    pub fn info(&mut self, code: &'static str, message: impl Into<String>, offset: usize) {
        self.push(Diagnostic::info(code, message, offset));
    }

    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Number of diagnostics with the given code.
    pub fn count(&self, code: &str) -> usize {
        self.items.iter().filter(|d| d.code == code).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
