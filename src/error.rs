//! Error types for template scanning, CSS parsing, and configuration.
//!
//! [`ScanError`] is produced while locating tagged templates and their
//! interpolations. [`ParseError`] is produced by the CSS parser and carries a
//! span into the placeholder-encoded CSS buffer. [`LitError`] combines both
//! for whole-file parsing. Placeholder restoration never fails; a missing
//! expression degrades to the literal placeholder marker instead.

use crate::ast::span::{Position, Span};
use thiserror::Error;

// ── Parse errors ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Format the error with source context for display
    pub fn format_with_source(&self, source: &str, entry_name: Option<&str>) -> String {
        let Position { line, column } = Position::from_offset(source, self.span.start);
        let source_line = source.lines().nth(line.saturating_sub(1)).unwrap_or("");

        let location = if let Some(name) = entry_name {
            format!(" --> {name}:{line}:{column}")
        } else {
            format!(" --> {line}:{column}")
        };

        let pointer = " ".repeat(column.saturating_sub(1)) + &"^".repeat(self.span.len().max(1));

        let mut output = format!(
            "Error: {}\n{location}\n  |\n{line:>3} | {source_line}\n    | {pointer}",
            self.message
        );

        if let Some(hint) = &self.hint {
            output.push_str(&format!("\n  = hint: {hint}"));
        }

        output
    }
}

// ── Scan errors ─────────────────────────────────────────────────────────

/// An error raised while splitting a template literal or locating tagged
/// templates in host source code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub span: Span,
    pub message: String,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn unterminated_template(start: usize, end: usize) -> Self {
        Self::new(
            ScanErrorKind::UnterminatedTemplate,
            Span::new(start, end),
            "unterminated template literal",
        )
    }

    pub fn unterminated_interpolation(start: usize, end: usize) -> Self {
        Self::new(
            ScanErrorKind::UnterminatedInterpolation,
            Span::new(start, end),
            "unterminated `${` interpolation",
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    UnterminatedTemplate,
    UnterminatedInterpolation,
    /// Template pieces do not line up (`quasis.len() != expressions.len() + 1`).
    MalformedTemplate,
}

// ── Config errors ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid placeholder prefix {0:?}: expected one or more of [A-Za-z0-9_-]")]
    InvalidPrefix(String),
    #[error("invalid tag name {0:?}")]
    InvalidTag(String),
    #[error("failed to parse options: {0}")]
    Toml(String),
}

// ── Combined ────────────────────────────────────────────────────────────

/// Error returned by [`parse_document`](crate::parse_document) and
/// [`parse_template`](crate::parse_template).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LitError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// The CSS inside template number `template` (zero-based, in file
    /// order) was rejected by the parser. The span points into the template
    /// body for [`parse_template`](crate::parse_template) and into the file
    /// for [`parse_document`](crate::parse_document).
    #[error("template {template}: {error}")]
    Parse { template: usize, error: ParseError },
    #[error("invalid options: {0}")]
    Config(#[from] ConfigError),
}
