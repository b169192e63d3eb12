use tracing::{debug, warn};

use super::{Expression, ExpressionTable, inline_placeholder, placeholder};
use crate::ast::span::Span;
use crate::options::LitOptions;
use crate::template::TemplateSpan;

/// Where one placeholder sits in the encoded CSS and in the template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSite {
    pub index: usize,
    /// Offsets of the marker (`/*PREFIX:N*/`, or `PREFIX:N:` inside a
    /// comment) in [`Encoded::css`].
    pub css: Span,
    /// Offsets of `${...}` in the template body.
    pub raw: Span,
}

/// Output of [`encode`]: a CSS-legal buffer plus what is needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub css: String,
    pub table: ExpressionTable,
    pub sites: Vec<PlaceholderSite>,
}

impl Encoded {
    /// Map an offset in the encoded CSS back to the template body. Offsets
    /// inside a placeholder map to the start of its interpolation.
    pub fn to_raw_offset(&self, css_offset: usize) -> usize {
        raw_offset(&self.sites, css_offset)
    }
}

pub(crate) fn raw_offset(sites: &[PlaceholderSite], css_offset: usize) -> usize {
    let mut last = None;
    for site in sites {
        if css_offset < site.css.start {
            break;
        }
        if site.css.contains(css_offset) {
            return site.raw.start;
        }
        last = Some(site);
    }
    match last {
        Some(site) => site.raw.end + (css_offset - site.css.end),
        None => css_offset,
    }
}

/// Replace each interpolation of `template` with a placeholder comment.
///
/// Literal segments are copied verbatim, so all whitespace around an
/// interpolation stays in the CSS buffer. Indices start at zero. An
/// interpolation inside a CSS comment gets the inline marker so the comment
/// is not closed early.
///
/// ```rust
/// use csslit::{LitOptions, TemplateSpan, encode};
///
/// let t = TemplateSpan::from_raw(".foo { ${expr}color: hotpink; }").unwrap();
/// let encoded = encode(&t, &LitOptions::new());
/// assert_eq!(encoded.css, ".foo { /*POSTCSS_LIT:0*/color: hotpink; }");
/// assert_eq!(encoded.table.resolve(0).as_deref(), Some("${expr}"));
/// ```
pub fn encode(template: &TemplateSpan, options: &LitOptions) -> Encoded {
    let prefix = choose_prefix(&options.placeholder_prefix, template.quasis());
    let mut table = ExpressionTable::new(prefix.clone());
    let mut sites = Vec::with_capacity(template.expressions().len());
    let mut css = String::new();
    let mut lexer = Lexer::default();

    for (i, quasi) in template.quasis().iter().enumerate() {
        css.push_str(quasi);
        lexer.feed(quasi);
        let Some(expr) = template.expressions().get(i) else {
            continue;
        };

        let index = table.push(Expression::from_raw(&expr.node));
        let marker = if lexer.in_comment() {
            inline_placeholder(&prefix, index)
        } else {
            placeholder(&prefix, index)
        };
        let start = css.len();
        css.push_str(&marker);
        sites.push(PlaceholderSite {
            index,
            css: Span::new(start, css.len()),
            raw: expr.span,
        });
    }

    debug!(
        prefix = %prefix,
        expressions = sites.len(),
        bytes = css.len(),
        "encoded template"
    );

    Encoded { css, table, sites }
}

/// CSS lexical state carried across literal segments.
#[derive(Debug, Default)]
enum Lexer {
    #[default]
    Code,
    Comment,
    Str(u8),
}

impl Lexer {
    fn feed(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            let next = bytes.get(i + 1).copied();
            match *self {
                Lexer::Code => match (b, next) {
                    (b'/', Some(b'*')) => {
                        *self = Lexer::Comment;
                        i += 1;
                    }
                    (b'"' | b'\'', _) => *self = Lexer::Str(b),
                    _ => {}
                },
                Lexer::Comment => {
                    if b == b'*' && next == Some(b'/') {
                        *self = Lexer::Code;
                        i += 1;
                    }
                }
                Lexer::Str(quote) => match b {
                    b'\\' => i += 1,
                    b'\n' => *self = Lexer::Code,
                    _ if b == quote => *self = Lexer::Code,
                    _ => {}
                },
            }
            i += 1;
        }
    }

    fn in_comment(&self) -> bool {
        matches!(self, Lexer::Comment)
    }
}

/// `base`, unless a literal segment already contains `base:`; then the
/// first `base_N` that appears nowhere in the literal text.
fn choose_prefix(base: &str, quasis: &[String]) -> String {
    let taken = |prefix: &str| {
        let needle = format!("{prefix}:");
        quasis.iter().any(|q| q.contains(&needle))
    };

    if !taken(base) {
        return base.to_string();
    }

    let mut n = 1usize;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken(&candidate) {
            warn!(
                prefix = base,
                salted = %candidate,
                "template text already contains the placeholder prefix"
            );
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_raw(raw: &str) -> Encoded {
        encode(&TemplateSpan::from_raw(raw).unwrap(), &LitOptions::new())
    }

    #[test]
    fn test_no_expressions() {
        let e = encode_raw(".foo { color: hotpink; }");
        assert_eq!(e.css, ".foo { color: hotpink; }");
        assert!(e.table.is_empty());
        assert!(e.sites.is_empty());
    }

    #[test]
    fn test_indices_increment_per_expression() {
        let e = encode_raw(".foo{${e1}color: red} .bar{${e1}color: lime}");
        assert_eq!(
            e.css,
            ".foo{/*POSTCSS_LIT:0*/color: red} .bar{/*POSTCSS_LIT:1*/color: lime}"
        );
        assert_eq!(e.table.len(), 2);
        assert_eq!(e.table.get(0), e.table.get(1));
    }

    #[test]
    fn test_multiline_expression_keeps_surrounding_whitespace() {
        let e = encode_raw(".foo { ${\n  expr\n}color: hotpink; }");
        assert_eq!(e.css, ".foo { /*POSTCSS_LIT:0*/color: hotpink; }");
        let expr = e.table.get(0).unwrap();
        assert_eq!(expr.leading, "\n  ");
        assert_eq!(expr.trailing, "\n");
    }

    #[test]
    fn test_prefix_salted_on_collision() {
        let e = encode_raw("/*POSTCSS_LIT:0*/ .foo { ${x}color: red; }");
        assert_eq!(e.table.prefix(), "POSTCSS_LIT_1");
        assert_eq!(
            e.css,
            "/*POSTCSS_LIT:0*/ .foo { /*POSTCSS_LIT_1:0*/color: red; }"
        );
    }

    #[test]
    fn test_expression_inside_comment_uses_inline_marker() {
        let e = encode_raw(".a {\n  /* color: ${c}; */\n  b: ${d};\n}");
        assert_eq!(
            e.css,
            ".a {\n  /* color: POSTCSS_LIT:0:; */\n  b: /*POSTCSS_LIT:1*/;\n}"
        );
        assert_eq!(e.to_raw_offset(e.css.find("; */").unwrap()), 21);
        assert_eq!(e.to_raw_offset(20), 17);
    }

    #[test]
    fn test_comment_opener_in_string_is_ignored() {
        let e = encode_raw("a { content: \"/*\"; b: ${x}; }");
        assert_eq!(e.css, "a { content: \"/*\"; b: /*POSTCSS_LIT:0*/; }");
    }

    #[test]
    fn test_custom_prefix() {
        let t = TemplateSpan::from_raw("a { ${x} }").unwrap();
        let e = encode(&t, &LitOptions::new().placeholder_prefix("LIT"));
        assert_eq!(e.css, "a { /*LIT:0*/ }");
    }

    #[test]
    fn test_to_raw_offset() {
        // raw:  ".a { ${longer}b: c }"
        // css:  ".a { /*POSTCSS_LIT:0*/b: c }"
        let e = encode_raw(".a { ${longer}b: c }");
        assert_eq!(e.to_raw_offset(2), 2);
        assert_eq!(e.to_raw_offset(5), 5);
        assert_eq!(e.to_raw_offset(10), 5);
        let b_css = e.css.find("b:").unwrap();
        assert_eq!(e.to_raw_offset(b_css), 14);
    }
}
