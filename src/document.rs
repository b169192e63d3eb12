//! Whole-file documents: host source with CSS templates embedded in it.
//!
//! A [`Document`] keeps the code between templates verbatim and owns one
//! [`StyleSheet`] per template. Each stylesheet has its own expression
//! table, so placeholder indices of different templates never interact.

use tracing::debug;

use crate::ast::span::{Position, Span};
use crate::ast::{Node, Root};
use crate::error::LitError;
use crate::options::LitOptions;
use crate::parser::parse_css;
use crate::placeholder::{ExpressionTable, PlaceholderSite, encode, raw_offset};
use crate::stringify::{Builder, Restorer, stringify};
use crate::template::{TemplateSpan, scan};

/// The parsed CSS of one template, plus the table that undoes its
/// placeholders.
///
/// `expressions` may be cleared or set to `None` by a transform; affected
/// placeholders are then written out as literal `/*PREFIX:N*/` comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    pub root: Root,
    pub expressions: Option<ExpressionTable>,
    sites: Vec<PlaceholderSite>,
}

impl StyleSheet {
    /// Write the template body, interpolations restored, to `builder`.
    pub fn stringify(&self, builder: &mut impl Builder) {
        let mut restorer = Restorer::new(builder, self.expressions.as_ref());
        stringify(&self.root, &mut restorer);
        restorer.finish();
    }

    /// The template body with interpolations restored.
    pub fn to_template_string(&self) -> String {
        let mut out = String::new();
        self.stringify(&mut out);
        out
    }

    /// Map an offset in the encoded CSS (a node's `source` span) to an
    /// offset in the original template body.
    pub fn template_offset(&self, css_offset: usize) -> usize {
        raw_offset(&self.sites, css_offset)
    }
}

/// Parse one template body into a [`StyleSheet`].
///
/// ```rust
/// use csslit::{LitOptions, TemplateSpan, parse_template};
///
/// let t = TemplateSpan::from_raw(".foo { ${expr}color: hotpink; }").unwrap();
/// let sheet = parse_template(&t, &LitOptions::new()).unwrap();
/// assert_eq!(sheet.to_template_string(), ".foo { ${expr}color: hotpink; }");
/// ```
pub fn parse_template(template: &TemplateSpan, options: &LitOptions) -> Result<StyleSheet, LitError> {
    options.validate()?;
    parse_encoded(template, options, 0)
}

/// Like [`parse_template`], from the body text between the backticks.
pub fn parse_template_str(raw: &str, options: &LitOptions) -> Result<StyleSheet, LitError> {
    let template = TemplateSpan::from_raw(raw)?;
    parse_template(&template, options)
}

/// Encode and parse one template. A parse error's span is mapped from the
/// encoded CSS back to the template body.
fn parse_encoded(template: &TemplateSpan, options: &LitOptions, index: usize) -> Result<StyleSheet, LitError> {
    let encoded = encode(template, options);
    let root = parse_css(&encoded.css).map_err(|mut error| {
        error.span = Span::new(
            raw_offset(&encoded.sites, error.span.start),
            raw_offset(&encoded.sites, error.span.end),
        );
        LitError::Parse { template: index, error }
    })?;
    Ok(StyleSheet {
        root,
        expressions: Some(encoded.table),
        sites: encoded.sites,
    })
}

/// One template inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSheet {
    /// Host code from the end of the previous template (or the start of the
    /// file) up to and including this template's opening backtick.
    pub code_before: String,
    pub tag: String,
    /// File offsets of the template body.
    pub content: Span,
    pub sheet: StyleSheet,
}

impl EmbeddedSheet {
    /// File offset of `css_offset` in the encoded CSS of this template.
    pub fn file_offset(&self, css_offset: usize) -> usize {
        self.content.start + self.sheet.template_offset(css_offset)
    }

    /// Line and column in `source` (the file this sheet was parsed from).
    pub fn position(&self, source: &str, css_offset: usize) -> Position {
        Position::from_offset(source, self.file_offset(css_offset))
    }

    /// Where `node` starts in `source`, if it came from the parser.
    pub fn node_position(&self, source: &str, node: &Node) -> Option<Position> {
        node.source().map(|span| self.position(source, span.start))
    }
}

/// A source file split into host code and parsed CSS templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub sheets: Vec<EmbeddedSheet>,
    /// Host code after the last template, closing backtick included.
    pub code_after: String,
}

impl Document {
    /// Write the whole file to `builder`.
    pub fn stringify(&self, builder: &mut impl Builder) {
        for embedded in &self.sheets {
            builder.append(&embedded.code_before);
            embedded.sheet.stringify(builder);
        }
        builder.append(&self.code_after);
    }

    /// The whole file, interpolations restored. Unchanged sheets give back
    /// the input byte for byte.
    pub fn to_source_string(&self) -> String {
        let mut out = String::new();
        self.stringify(&mut out);
        out
    }
}

/// Find and parse every CSS template in `source`.
///
/// ```rust
/// use csslit::{LitOptions, parse_document};
///
/// let src = "const style = css`\n  .foo { ${expr}color: hotpink; }\n`;\n";
/// let doc = parse_document(src, &LitOptions::new()).unwrap();
/// assert_eq!(doc.sheets.len(), 1);
/// assert_eq!(doc.to_source_string(), src);
/// ```
pub fn parse_document(source: &str, options: &LitOptions) -> Result<Document, LitError> {
    options.validate()?;
    let templates = scan(source, options)?;
    debug!(templates = templates.len(), "parsing document");

    let mut sheets = Vec::with_capacity(templates.len());
    let mut cursor = 0;
    for (index, found) in templates.into_iter().enumerate() {
        let sheet = parse_encoded(&found.template, options, index).map_err(|err| match err {
            LitError::Parse { template, mut error } => {
                error.span = error.span.offset(found.content.start);
                LitError::Parse { template, error }
            }
            other => other,
        })?;
        sheets.push(EmbeddedSheet {
            code_before: source[cursor..found.content.start].to_string(),
            tag: found.tag,
            content: found.content,
            sheet,
        });
        cursor = found.content.end;
    }

    Ok(Document {
        sheets,
        code_after: source[cursor..].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trip() {
        let sheet = parse_template_str(".foo { ${expr}color: hotpink; }", &LitOptions::new()).unwrap();
        let Node::Rule(rule) = &sheet.root.nodes[0] else {
            panic!("expected rule");
        };
        assert!(matches!(&rule.nodes[0], Node::Comment(c) if c.text == "POSTCSS_LIT:0"));
        assert_eq!(sheet.to_template_string(), ".foo { ${expr}color: hotpink; }");
    }

    #[test]
    fn test_missing_table_degrades() {
        let mut sheet = parse_template_str(".foo { ${expr}color: hotpink; }", &LitOptions::new()).unwrap();
        sheet.expressions = None;
        assert_eq!(sheet.to_template_string(), ".foo { /*POSTCSS_LIT:0*/color: hotpink; }");
    }

    #[test]
    fn test_parse_error_names_template() {
        let src = "css`a { b: c }`; css`a { } }`;";
        let err = parse_document(src, &LitOptions::new()).unwrap_err();
        assert!(matches!(err, LitError::Parse { template: 1, .. }));
    }

    #[test]
    fn test_parse_error_span_maps_to_file() {
        let src = "css`a { b: c }`; css`a { ${x} } }`;";
        let LitError::Parse { error, .. } = parse_document(src, &LitOptions::new()).unwrap_err() else {
            panic!("expected parse error");
        };
        assert_eq!(error.span.start, src.rfind('}').unwrap());
        assert_eq!(error.hint.as_deref(), Some("this `}` has no matching `{`"));
    }

    #[test]
    fn test_parse_error_span_maps_to_template_body() {
        let LitError::Parse { error, .. } = parse_template_str("a { ${x} } }", &LitOptions::new()).unwrap_err() else {
            panic!("expected parse error");
        };
        assert_eq!(error.span.start, 11);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = parse_document("", &LitOptions::new().placeholder_prefix("a b")).unwrap_err();
        assert!(matches!(err, LitError::Config(_)));
    }

    #[test]
    fn test_node_position_in_file() {
        let src = "const a = 1;\nconst s = css`\n  .a { ${x} color: red; }\n`;";
        let doc = parse_document(src, &LitOptions::new()).unwrap();
        let sheet = &doc.sheets[0];
        let Node::Rule(rule) = &sheet.sheet.root.nodes[0] else {
            panic!("expected rule");
        };
        // The declaration follows the placeholder, so its offset is shifted
        // back to the interpolation's width in the file.
        let decl = &rule.nodes[1];
        let pos = sheet.node_position(src, decl).unwrap();
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 13);
    }

    #[test]
    fn test_no_templates() {
        let src = "export const x = `plain ${y}`;\n";
        let doc = parse_document(src, &LitOptions::new()).unwrap();
        assert!(doc.sheets.is_empty());
        assert_eq!(doc.code_after, src);
        assert_eq!(doc.to_source_string(), src);
    }
}
