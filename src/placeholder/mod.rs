//! Placeholder grammar and the per-template expression table.
//!
//! Every `${...}` interpolation is replaced by a CSS comment of the form
//! `/*PREFIX:N*/` before the CSS parser sees the text. A comment is lexically
//! inert everywhere CSS allows whitespace, so the parser keeps it verbatim in
//! node text or formatting raws. On the way back out, every string emitted by
//! the stringifier is matched against the exact placeholder pattern and the
//! original interpolation is substituted from the [`ExpressionTable`].
//!
//! Only comments whose whole body is `PREFIX:` followed by ASCII digits are
//! placeholders. `/*BOOP*/` or `/* POSTCSS_LIT:0 */` are ordinary comments.
//!
//! An interpolation that sits inside a CSS comment cannot become a nested
//! comment, which would close the outer one early. There the marker is the
//! bare `PREFIX:N:` form instead. The encoder guarantees `PREFIX:` occurs in
//! no literal text, so the bare form is just as unambiguous.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

mod encode;

pub use encode::{Encoded, PlaceholderSite, encode};
pub(crate) use encode::raw_offset;

/// Prefix reserved for placeholder comments unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "POSTCSS_LIT";

/// The placeholder comment for interpolation `index`.
///
/// ```rust
/// assert_eq!(csslit::placeholder("POSTCSS_LIT", 3), "/*POSTCSS_LIT:3*/");
/// ```
pub fn placeholder(prefix: &str, index: usize) -> String {
    format!("/*{prefix}:{index}*/")
}

/// The marker for interpolation `index` when it falls inside a CSS comment.
///
/// ```rust
/// assert_eq!(csslit::inline_placeholder("POSTCSS_LIT", 3), "POSTCSS_LIT:3:");
/// ```
pub fn inline_placeholder(prefix: &str, index: usize) -> String {
    format!("{prefix}:{index}:")
}

/// Compiled matcher for one placeholder prefix.
#[derive(Debug, Clone)]
pub struct PlaceholderPattern {
    regex: Regex,
}

impl PlaceholderPattern {
    /// Build the matcher for `prefix`. The default prefix is compiled once
    /// per process.
    ///
    /// # Panics
    ///
    /// Panics if the escaped pattern fails to compile, which cannot happen
    /// for any prefix string.
    pub fn new(prefix: &str) -> Self {
        if prefix == DEFAULT_PREFIX {
            static DEFAULT: OnceLock<PlaceholderPattern> = OnceLock::new();
            return DEFAULT.get_or_init(|| Self::compile(prefix)).clone();
        }
        Self::compile(prefix)
    }

    #[allow(clippy::expect_used)]
    fn compile(prefix: &str) -> Self {
        let prefix = regex::escape(prefix);
        let pattern = format!(r"/\*{prefix}:([0-9]+)\*/|{prefix}:([0-9]+):");
        Self {
            regex: Regex::new(&pattern).expect("escaped placeholder pattern is valid"),
        }
    }

    /// Whether `text` is exactly one placeholder comment.
    pub fn is_placeholder(&self, text: &str) -> bool {
        self.index_of(text).is_some()
    }

    /// Index of the placeholder if `text` is exactly one placeholder comment.
    pub fn index_of(&self, text: &str) -> Option<usize> {
        let caps = self.regex.captures(text)?;
        let m = caps.get(1)?;
        if caps.get(0)?.as_str().len() != text.len() {
            return None;
        }
        m.as_str().parse().ok()
    }

    /// Whether `text` contains any placeholder, in either form.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replace each placeholder in `text` with `resolve(index)`. Placeholders
    /// for which `resolve` returns `None` are left untouched.
    pub fn replace_all<'a>(
        &self,
        text: &'a str,
        mut resolve: impl FnMut(usize) -> Option<String>,
    ) -> Cow<'a, str> {
        self.regex.replace_all(text, |caps: &Captures<'_>| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .and_then(&mut resolve)
                .unwrap_or_else(|| caps[0].to_string())
        })
    }
}

/// One interpolation body, split into its surrounding whitespace and the
/// expression text proper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub leading: String,
    pub text: String,
    pub trailing: String,
}

impl Expression {
    /// Split the verbatim content of a `${...}`.
    pub fn from_raw(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return Self {
                leading: raw.to_string(),
                text: String::new(),
                trailing: String::new(),
            };
        }
        let start = raw.len() - raw.trim_start().len();
        let end = start + text.len();
        Self {
            leading: raw[..start].to_string(),
            text: text.to_string(),
            trailing: raw[end..].to_string(),
        }
    }

    /// The interpolation as written in the template, `${` and `}` included.
    pub fn to_source(&self) -> String {
        format!("${{{}{}{}}}", self.leading, self.text, self.trailing)
    }
}

/// Per-template mapping from placeholder index to original interpolation.
///
/// Indices start at zero for every template. Entries may be cleared
/// individually ([`remove`](Self::remove)) or all at once
/// ([`clear`](Self::clear)); cleared placeholders stringify as their
/// literal `/*PREFIX:N*/` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionTable {
    prefix: String,
    entries: Vec<Option<Expression>>,
}

impl ExpressionTable {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
        }
    }

    /// The prefix the template was encoded with. It can differ from the
    /// configured prefix when the template text already contained it.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn pattern(&self) -> PlaceholderPattern {
        PlaceholderPattern::new(&self.prefix)
    }

    pub(crate) fn push(&mut self, expression: Expression) -> usize {
        self.entries.push(Some(expression));
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Expression> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Clear one entry, returning it. Later indices keep their positions.
    pub fn remove(&mut self, index: usize) -> Option<Expression> {
        self.entries.get_mut(index).and_then(Option::take)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of slots, cleared ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source text for placeholder `index`, if its entry is intact.
    pub fn resolve(&self, index: usize) -> Option<String> {
        self.get(index).map(Expression::to_source)
    }
}
