//! Template spans: the literal segments and interpolations of one tagged
//! template literal.
//!
//! A [`TemplateSpan`] is the read-only input to the placeholder encoder. It
//! can be built from body text with [`TemplateSpan::from_raw`], from
//! pre-split pieces with [`TemplateSpan::new`], or discovered in host source
//! with [`scan`].
//!
//! Interpolation bodies are opaque. The splitter only tracks enough lexical
//! structure (braces, strings, comments, nested template literals) to find
//! the closing `}` of each `${`.

use crate::ast::span::{Span, Spanned};
use crate::error::{ScanError, ScanErrorKind};

pub mod scan;

pub use scan::{TaggedTemplate, scan};

/// One tagged-template occurrence, split into literal segments (`quasis`)
/// and interpolation bodies.
///
/// Invariant: `quasis.len() == expressions.len() + 1`. Expression text is the
/// verbatim content between `${` and `}`, whitespace included; each span
/// covers the full `${...}` in [`raw_text`](TemplateSpan::raw_text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpan {
    quasis: Vec<String>,
    expressions: Vec<Spanned<String>>,
}

impl TemplateSpan {
    /// Build a template from literal segments and interpolation bodies.
    ///
    /// ```rust
    /// use csslit::TemplateSpan;
    ///
    /// let t = TemplateSpan::new(
    ///     vec![".foo { ".into(), "color: hotpink; }".into()],
    ///     vec!["expr".into()],
    /// ).unwrap();
    /// assert_eq!(t.raw_text(), ".foo { ${expr}color: hotpink; }");
    /// ```
    pub fn new(quasis: Vec<String>, expressions: Vec<String>) -> Result<Self, ScanError> {
        if quasis.len() != expressions.len() + 1 {
            return Err(ScanError::new(
                ScanErrorKind::MalformedTemplate,
                Span::default(),
                format!(
                    "template has {} literal segments for {} expressions",
                    quasis.len(),
                    expressions.len()
                ),
            ));
        }

        let mut offset = 0;
        let mut spanned = Vec::with_capacity(expressions.len());
        for (quasi, expr) in quasis.iter().zip(expressions) {
            offset += quasi.len();
            let len = expr.len() + 3;
            spanned.push(Spanned::new(expr, Span::new(offset, offset + len)));
            offset += len;
        }

        Ok(Self {
            quasis,
            expressions: spanned,
        })
    }

    /// Split template body text (the content between the backticks) on its
    /// `${...}` interpolations. `\${` is an escaped literal.
    pub fn from_raw(raw: &str) -> Result<Self, ScanError> {
        let body = split_body(raw.as_bytes(), 0, false)?;
        Ok(Self::from_body(raw, Span::new(0, raw.len()), &body.expressions))
    }

    /// Assemble a template whose body occupies `body` within `source`.
    /// Each range covers one `${` through its closing `}`.
    pub(crate) fn from_body(source: &str, body: Span, ranges: &[Span]) -> Self {
        let mut quasis = Vec::with_capacity(ranges.len() + 1);
        let mut expressions = Vec::with_capacity(ranges.len());
        let mut cursor = body.start;

        for range in ranges {
            quasis.push(source[cursor..range.start].to_string());
            expressions.push(Spanned::new(
                source[range.start + 2..range.end - 1].to_string(),
                Span::new(range.start - body.start, range.end - body.start),
            ));
            cursor = range.end;
        }
        quasis.push(source[cursor..body.end].to_string());

        Self {
            quasis,
            expressions,
        }
    }

    pub fn quasis(&self) -> &[String] {
        &self.quasis
    }

    pub fn expressions(&self) -> &[Spanned<String>] {
        &self.expressions
    }

    /// Reconstruct the template body exactly as written.
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        for (i, quasi) in self.quasis.iter().enumerate() {
            out.push_str(quasi);
            if let Some(expr) = self.expressions.get(i) {
                out.push_str("${");
                out.push_str(&expr.node);
                out.push('}');
            }
        }
        out
    }
}

// ── Lexical helpers ─────────────────────────────────────────────────────

/// Result of walking a template body.
#[derive(Debug)]
pub(crate) struct Body {
    /// Offset of the closing backtick, or the input length for an
    /// unterminated walk.
    pub end: usize,
    /// `${` .. `}` ranges, in source order.
    pub expressions: Vec<Span>,
}

/// Walk a template body starting at `start`. With `terminated`, the walk
/// stops at the first unescaped backtick and running out of input is an
/// error; otherwise it runs to the end of `bytes`.
pub(crate) fn split_body(bytes: &[u8], start: usize, terminated: bool) -> Result<Body, ScanError> {
    let mut expressions = Vec::new();
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' if terminated => return Ok(Body { end: i, expressions }),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                let close = skip_interpolation(bytes, i + 2)?;
                expressions.push(Span::new(i, close + 1));
                i = close + 1;
            }
            _ => i += 1,
        }
    }

    if terminated {
        Err(ScanError::unterminated_template(
            start.saturating_sub(1),
            bytes.len(),
        ))
    } else {
        Ok(Body {
            end: bytes.len(),
            expressions,
        })
    }
}

/// Find the `}` closing an interpolation whose body starts at `start`.
fn skip_interpolation(bytes: &[u8], start: usize) -> Result<usize, ScanError> {
    let mut depth = 1usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
                i += 1;
            }
            quote @ (b'\'' | b'"') => i = skip_string(bytes, i + 1, quote),
            b'`' => {
                let nested = split_body(bytes, i + 1, true)
                    .map_err(|_| ScanError::unterminated_interpolation(start - 2, bytes.len()))?;
                i = nested.end + 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            _ => i += 1,
        }
    }

    Err(ScanError::unterminated_interpolation(
        start.saturating_sub(2),
        bytes.len(),
    ))
}

/// Offset just past the closing `quote`, or the input length.
pub(crate) fn skip_string(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Offset of the newline ending a `//` comment, or the input length.
pub(crate) fn skip_line_comment(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| i + p)
}

/// Offset just past the `*/` ending a block comment, or the input length.
pub(crate) fn skip_block_comment(bytes: &[u8], i: usize) -> usize {
    bytes[i + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map_or(bytes.len(), |p| i + 2 + p + 2)
}
