//! Discovery of CSS tagged templates in JavaScript/TypeScript source.
//!
//! The scanner is deliberately shallow: it understands strings, comments,
//! and template literals well enough to avoid false matches, and treats
//! everything else as opaque code. Regular expression literals are not
//! recognised, so a regex containing a backtick or quote can confuse it.

use tracing::trace;

use super::{TemplateSpan, skip_block_comment, skip_line_comment, skip_string, split_body};
use crate::ast::span::Span;
use crate::error::ScanError;
use crate::options::LitOptions;

const DISABLE_FILE: &str = "csslit-disable";
const DISABLE_NEXT_LINE: &str = "csslit-disable-next-line";

/// A tagged template literal whose tag marks it as CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTemplate {
    /// The tag as written, e.g. `css` or `styled.div`.
    pub tag: String,
    /// File offsets of the tag expression.
    pub tag_span: Span,
    /// File offsets of the body, excluding the backticks.
    pub content: Span,
    pub template: TemplateSpan,
}

/// Find every CSS tagged template in `source`, in source order.
///
/// ```rust
/// use csslit::{LitOptions, scan};
///
/// let src = "const a = css`.foo { ${x}color: red; }`;\nconst b = html`<p></p>`;";
/// let found = scan(src, &LitOptions::new()).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].tag, "css");
/// assert_eq!(found[0].template.expressions()[0].node, "x");
/// ```
pub fn scan(source: &str, options: &LitOptions) -> Result<Vec<TaggedTemplate>, ScanError> {
    let bytes = source.as_bytes();
    let mut found = Vec::new();
    let mut skip_line = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => i = skip_string(bytes, i + 1, quote),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = skip_line_comment(bytes, i);
                if options.disable_comments && source[i + 2..end].trim() == DISABLE_NEXT_LINE {
                    skip_line = Some(line_at(bytes, i) + 1);
                }
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = skip_block_comment(bytes, i);
                let body = source[i + 2..end].trim_end_matches("*/").trim();
                if options.disable_comments {
                    if body == DISABLE_FILE {
                        trace!(offset = i, "file disabled by comment");
                        return Ok(Vec::new());
                    }
                    if body == DISABLE_NEXT_LINE {
                        skip_line = Some(line_at(bytes, end) + 1);
                    }
                }
                i = end;
            }
            b'`' => {
                let body = split_body(bytes, i + 1, true)?;
                let (tag, tag_span) = tag_before(source, i);
                let disabled = skip_line == Some(line_at(bytes, tag_span.start));

                if !tag.is_empty() && options.matches_tag(&tag) {
                    let content = Span::new(i + 1, body.end);
                    if disabled {
                        trace!(tag = %tag, offset = i, "template disabled by comment");
                    } else {
                        found.push(TaggedTemplate {
                            template: TemplateSpan::from_body(source, content, &body.expressions),
                            tag,
                            tag_span,
                            content,
                        });
                    }
                }
                i = body.end + 1;
            }
            _ => i += 1,
        }
    }

    Ok(found)
}

/// The dotted identifier path immediately before the backtick at `tick`,
/// allowing whitespace in between.
fn tag_before(source: &str, tick: usize) -> (String, Span) {
    let bytes = source.as_bytes();
    let mut end = tick;
    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }

    let mut start = end;
    while start > 0 {
        let b = bytes[start - 1];
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.' {
            start -= 1;
        } else {
            break;
        }
    }

    let tag = source[start..end].trim_matches('.');
    (tag.to_string(), Span::new(start, end))
}

fn line_at(bytes: &[u8], offset: usize) -> usize {
    1 + bytes[..offset.min(bytes.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanErrorKind;

    fn scan_default(source: &str) -> Vec<TaggedTemplate> {
        scan(source, &LitOptions::new()).expect("scan failed")
    }

    #[test]
    fn test_finds_css_templates_in_order() {
        let src = "css`.a {}`;\nconst x = 808;\ncss`.b { ${y}color: lime; }`;";
        let found = scan_default(src);
        assert_eq!(found.len(), 2);
        assert_eq!(&src[found[0].content.start..found[0].content.end], ".a {}");
        assert_eq!(found[1].template.raw_text(), ".b { ${y}color: lime; }");
        assert_eq!(found[1].tag_span, Span::new(27, 30));
    }

    #[test]
    fn test_ignores_strings_comments_and_other_tags() {
        let src = r#"
            const s = "css`.x {}`";
            // css`.y {}`
            /* css`.z {}` */
            html`<div>${css`.inner {}`}</div>`;
            css`.real {}`;
        "#;
        let found = scan_default(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].template.raw_text(), ".real {}");
    }

    #[test]
    fn test_dotted_and_spaced_tags() {
        let opts = LitOptions::new().tags(["css", "styled.div"]);
        let src = "styled.div `color: red;`; theme.css`a{}`; styled.span`b{}`;";
        let found = scan(src, &opts).unwrap();
        let tags: Vec<_> = found.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, ["styled.div", "theme.css"]);
    }

    #[test]
    fn test_disable_next_line() {
        let src = "// csslit-disable-next-line\ncss`.skip {}`;\ncss`.keep {}`;";
        let found = scan_default(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].template.raw_text(), ".keep {}");

        let found = scan(src, &LitOptions::new().disable_comments(false)).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_disable_file() {
        let src = "/* csslit-disable */\ncss`.a {}`;";
        assert!(scan_default(src).is_empty());
    }

    #[test]
    fn test_unterminated_template() {
        let err = scan("css`.foo {", &LitOptions::new()).unwrap_err();
        assert_eq!(err.kind, ScanErrorKind::UnterminatedTemplate);
        assert_eq!(err.span.start, 3);
    }
}
