//! CSS parser, built on [pest](https://pest.rs/).
//!
//! The grammar is defined in `css.pest`. This module converts pest's parse
//! tree into the node tree defined in [`crate::ast`], recovering formatting
//! raws from the text between pair spans so that the tree stringifies back
//! to its input byte for byte.
//!
//! The parser knows nothing about interpolations: placeholder comments are
//! kept as comment nodes or as part of selector, property, and value text.

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;
use tracing::debug;

use crate::ast::{self, AtRule, Comment, Declaration, Node, RawValue, Raws, Root, Span};
use crate::error::ParseError;

#[derive(Parser)]
#[grammar = "parser/css.pest"]
struct CssParser;

/// Parse CSS text into a [`Root`].
///
/// ```rust
/// use csslit::{Node, parse_css, to_css};
///
/// let css = ".foo {\n  color: hotpink;\n}\n";
/// let root = parse_css(css).unwrap();
/// assert!(matches!(root.nodes[0], Node::Rule(_)));
/// assert_eq!(to_css(&root), css);
/// ```
pub fn parse_css(css: &str) -> Result<Root, ParseError> {
    let mut pairs = CssParser::parse(Rule::stylesheet, css).map_err(|e| {
        let span = pest_span_to_span(&e);
        let error = ParseError::new(span, format!("invalid CSS: {}", e.variant.message()));
        match css.get(span.start..).and_then(|rest| rest.chars().next()) {
            Some('}') => error.with_hint("this `}` has no matching `{`"),
            None => error.with_hint("a block, string, or comment is not closed"),
            Some(_) => error,
        }
    })?;

    let stylesheet = pairs
        .next()
        .ok_or_else(|| ParseError::new(Span::new(0, css.len()), "empty parse tree"))?;

    let body = Body::build(css, stylesheet.into_inner(), 0, css.len())?;
    debug!(nodes = body.nodes.len(), bytes = css.len(), "parsed stylesheet");

    Ok(Root {
        nodes: body.nodes,
        raws: Raws {
            after: Some(body.after),
            semicolon: body.semicolon,
            ..Raws::default()
        },
        source: Some(Span::new(0, css.len())),
    })
}

fn pest_span_to_span(e: &pest::error::Error<Rule>) -> Span {
    match &e.location {
        pest::error::InputLocation::Pos(p) => Span::new(*p, *p + 1),
        pest::error::InputLocation::Span((s, e)) => Span::new(*s, *e),
    }
}

fn pair_span(pair: &Pair<Rule>) -> Span {
    let s = pair.as_span();
    Span::new(s.start(), s.end())
}

fn expect<'i>(
    pairs: &mut Pairs<'i, Rule>,
    expected: Rule,
    parent: Span,
) -> Result<Pair<'i, Rule>, ParseError> {
    match pairs.next() {
        Some(pair) if pair.as_rule() == expected => Ok(pair),
        other => Err(ParseError::new(
            other.as_ref().map_or(parent, pair_span),
            format!("expected {expected:?}, found {:?}", other.map(|p| p.as_rule())),
        )),
    }
}

// ── Container bodies ────────────────────────────────────────────────────

/// Children of a root or block plus the trailing raws of the container.
struct Body {
    nodes: Vec<Node>,
    after: String,
    semicolon: bool,
}

impl Body {
    /// Build the nodes of a container whose content spans `start..end`.
    /// Text between nodes becomes the next node's `raws.before`; a `;`
    /// directly after a declaration or statement at-rule is its terminator
    /// and is not kept in any raw.
    fn build(css: &str, pairs: Pairs<Rule>, start: usize, end: usize) -> Result<Self, ParseError> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut cursor = start;

        for pair in pairs {
            if pair.as_rule() == Rule::EOI {
                break;
            }
            let span = pair_span(&pair);
            let before = strip_terminator(&css[cursor..span.start], nodes.last()).0;
            let mut node = build_node(css, pair)?;
            node.raws_mut().before = Some(before.to_string());
            nodes.push(node);
            cursor = span.end;
        }

        let (after, semicolon) = strip_terminator(&css[cursor..end], nodes.last());
        Ok(Self {
            nodes,
            after: after.to_string(),
            semicolon,
        })
    }
}

/// Drop the `;` that terminates `prev`, if `gap` starts with one.
fn strip_terminator<'a>(gap: &'a str, prev: Option<&Node>) -> (&'a str, bool) {
    match prev {
        Some(node) if node.takes_semicolon() => match gap.strip_prefix(';') {
            Some(rest) => (rest, true),
            None => (gap, false),
        },
        _ => (gap, false),
    }
}

// ── Node building ───────────────────────────────────────────────────────

fn build_node(css: &str, pair: Pair<Rule>) -> Result<Node, ParseError> {
    match pair.as_rule() {
        Rule::rule => build_rule(css, pair).map(Node::Rule),
        Rule::at_rule => build_at_rule(css, pair).map(Node::AtRule),
        Rule::decl => build_decl(pair).map(Node::Decl),
        Rule::comment_node => Ok(Node::Comment(build_comment(pair))),
        other => Err(ParseError::new(
            pair_span(&pair),
            format!("unexpected rule in node position: {other:?}"),
        )),
    }
}

fn build_block(css: &str, block: Pair<Rule>) -> Result<Body, ParseError> {
    let span = pair_span(&block);
    // Content sits between the braces.
    Body::build(css, block.into_inner(), span.start + 1, span.end - 1)
}

fn build_rule(css: &str, pair: Pair<Rule>) -> Result<ast::Rule, ParseError> {
    let span = pair_span(&pair);
    let mut inner = pair.into_inner();
    let selector = expect(&mut inner, Rule::selector, span)?;
    let block = expect(&mut inner, Rule::block, span)?;

    let between = &css[pair_span(&selector).end..pair_span(&block).start];
    let body = build_block(css, block)?;

    Ok(ast::Rule {
        selector: selector.as_str().to_string(),
        nodes: body.nodes,
        raws: Raws {
            between: Some(between.to_string()),
            after: Some(body.after),
            semicolon: body.semicolon,
            ..Raws::default()
        },
        source: Some(span),
    })
}

fn build_at_rule(css: &str, pair: Pair<Rule>) -> Result<AtRule, ParseError> {
    let span = pair_span(&pair);
    let mut inner = pair.into_inner();
    let name = expect(&mut inner, Rule::at_name, span)?.as_str().to_string();

    let mut at = AtRule::new(name, "");
    at.source = Some(span);

    for child in inner {
        match child.as_rule() {
            Rule::at_after_name => at.raws.after_name = Some(child.as_str().to_string()),
            Rule::at_params => at.params = child.as_str().to_string(),
            Rule::at_between => at.raws.between = Some(child.as_str().to_string()),
            Rule::block => {
                let body = build_block(css, child)?;
                at.nodes = Some(body.nodes);
                at.raws.after = Some(body.after);
                at.raws.semicolon = body.semicolon;
            }
            other => {
                return Err(ParseError::new(
                    pair_span(&child),
                    format!("unexpected rule in at-rule: {other:?}"),
                ));
            }
        }
    }

    Ok(at)
}

fn build_decl(pair: Pair<Rule>) -> Result<Declaration, ParseError> {
    let span = pair_span(&pair);
    let mut inner = pair.into_inner();
    let prop = expect(&mut inner, Rule::prop, span)?.as_str();
    let between = expect(&mut inner, Rule::decl_between, span)?.as_str();

    let mut raw_value = String::new();
    for child in inner {
        match child.as_rule() {
            Rule::value | Rule::value_trailing => raw_value.push_str(child.as_str()),
            other => {
                return Err(ParseError::new(
                    pair_span(&child),
                    format!("unexpected rule in declaration: {other:?}"),
                ));
            }
        }
    }

    let mut decl = Declaration::new(prop, "");
    decl.source = Some(span);
    decl.raws.between = Some(between.to_string());

    let raw_value = match split_important(&raw_value) {
        Some((value, important)) => {
            decl.important = true;
            decl.raws.important = Some(important.to_string());
            value
        }
        None => raw_value.as_str(),
    };

    let value = raw_value.trim_end();
    decl.value = value.to_string();
    if value != raw_value {
        decl.raws.value = Some(RawValue::new(value, raw_value));
    }

    Ok(decl)
}

/// Split `red !important ` into `red` and ` !important `.
fn split_important(raw: &str) -> Option<(&str, &str)> {
    const IMPORTANT: &str = "!important";
    let trimmed = raw.trim_end();
    let bang = trimmed.len().checked_sub(IMPORTANT.len())?;
    if !trimmed.is_char_boundary(bang) || !trimmed[bang..].eq_ignore_ascii_case(IMPORTANT) {
        return None;
    }
    let value = trimmed[..bang].trim_end();
    Some((value, &raw[value.len()..]))
}

fn build_comment(pair: Pair<Rule>) -> Comment {
    let text = pair.as_str();
    let body = &text[2..text.len() - 2];
    let trimmed = body.trim();

    let mut comment = Comment::new(trimmed);
    comment.source = Some(pair_span(&pair));
    if trimmed.is_empty() {
        comment.raws.left = Some(body.to_string());
        comment.raws.right = Some(String::new());
    } else {
        let left = body.len() - body.trim_start().len();
        comment.raws.left = Some(body[..left].to_string());
        comment.raws.right = Some(body[left + trimmed.len()..].to_string());
    }
    comment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_rule(root: &Root) -> &ast::Rule {
        match &root.nodes[0] {
            Node::Rule(rule) => rule,
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_rule() {
        let root = parse_css(".foo { color: hotpink; }").unwrap();
        assert_eq!(root.nodes.len(), 1);
        let rule = first_rule(&root);
        assert_eq!(rule.selector, ".foo");
        assert_eq!(rule.raws.between.as_deref(), Some(" "));
        assert_eq!(rule.raws.after.as_deref(), Some(" "));
        assert!(rule.raws.semicolon);
        match &rule.nodes[0] {
            Node::Decl(decl) => {
                assert_eq!(decl.prop, "color");
                assert_eq!(decl.value, "hotpink");
                assert_eq!(decl.raws.before.as_deref(), Some(" "));
                assert_eq!(decl.raws.between.as_deref(), Some(": "));
            }
            other => panic!("expected decl, got {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_comment_is_a_node() {
        let root = parse_css(".foo { /*POSTCSS_LIT:0*/color: hotpink; }").unwrap();
        let rule = first_rule(&root);
        assert_eq!(rule.nodes.len(), 2);
        match &rule.nodes[0] {
            Node::Comment(c) => {
                assert_eq!(c.text, "POSTCSS_LIT:0");
                assert_eq!(c.raws.left.as_deref(), Some(""));
            }
            other => panic!("expected comment, got {other:?}"),
        }
        assert_eq!(rule.nodes[1].raws().before.as_deref(), Some(""));
    }

    #[test]
    fn test_placeholder_as_selector_and_property() {
        let root = parse_css("/*P:0*/ { /*P:1*/: red; }").unwrap();
        let rule = first_rule(&root);
        assert_eq!(rule.selector, "/*P:0*/");
        match &rule.nodes[0] {
            Node::Decl(decl) => assert_eq!(decl.prop, "/*P:1*/"),
            other => panic!("expected decl, got {other:?}"),
        }
    }

    #[test]
    fn test_comment_before_pseudo_selector_is_a_node() {
        for css in [
            "/* shared */\n:host { display: block; }",
            "/*POSTCSS_LIT:0*/\n:host { display: block; }",
            "/*POSTCSS_LIT:0*/ ::selection { color: red }",
        ] {
            let root = parse_css(css).unwrap();
            let kinds: Vec<_> = root.nodes.iter().map(Node::kind).collect();
            assert_eq!(kinds, ["comment", "rule"], "{css}");
            match &root.nodes[1] {
                Node::Rule(rule) => assert!(rule.selector.starts_with(':'), "{css}"),
                other => panic!("expected rule, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_flush_placeholder_joins_selector() {
        let root = parse_css("/*P:0*/:hover .x { color: red }").unwrap();
        assert_eq!(root.nodes.len(), 1);
        assert_eq!(first_rule(&root).selector, "/*P:0*/:hover .x");

        let root = parse_css("a { /*P:1*/ : /*P:2*/; }").unwrap();
        match &first_rule(&root).nodes[0] {
            Node::Decl(decl) => {
                assert_eq!(decl.prop, "/*P:1*/");
                assert_eq!(decl.value, "/*P:2*/");
            }
            other => panic!("expected decl, got {other:?}"),
        }
    }

    #[test]
    fn test_unusual_between() {
        let root = parse_css(".foo {\n  margin\n    :\n      10px;\n}").unwrap();
        match &first_rule(&root).nodes[0] {
            Node::Decl(decl) => {
                assert_eq!(decl.raws.between.as_deref(), Some("\n    :\n      "));
                assert_eq!(decl.value, "10px");
            }
            other => panic!("expected decl, got {other:?}"),
        }
    }

    #[test]
    fn test_stray_semicolons_land_in_raws() {
        let root = parse_css(".foo {\n  a: 1;\n\n  ;\n\n  b: 2;\n\n  ;\n}").unwrap();
        let rule = first_rule(&root);
        assert_eq!(rule.nodes.len(), 2);
        assert_eq!(rule.nodes[1].raws().before.as_deref(), Some("\n\n  ;\n\n  "));
        assert_eq!(rule.raws.after.as_deref(), Some("\n\n  ;\n"));
        assert!(rule.raws.semicolon);
    }

    #[test]
    fn test_multiline_value_and_trailing_space() {
        let root = parse_css("a { margin: 1px\n  2px ; color: red }").unwrap();
        let rule = first_rule(&root);
        match (&rule.nodes[0], &rule.nodes[1]) {
            (Node::Decl(margin), Node::Decl(color)) => {
                assert_eq!(margin.value, "1px\n  2px");
                assert_eq!(
                    margin.raws.value,
                    Some(RawValue::new("1px\n  2px", "1px\n  2px "))
                );
                assert_eq!(color.value, "red");
                assert_eq!(color.raws.value, None);
            }
            other => panic!("expected decls, got {other:?}"),
        }
        assert!(!rule.raws.semicolon);
        assert_eq!(rule.raws.after.as_deref(), Some(" "));
    }

    #[test]
    fn test_important() {
        let root = parse_css("a { color: red  !IMPORTANT ; }").unwrap();
        match &first_rule(&root).nodes[0] {
            Node::Decl(decl) => {
                assert!(decl.important);
                assert_eq!(decl.value, "red");
                assert_eq!(decl.raws.important.as_deref(), Some("  !IMPORTANT "));
            }
            other => panic!("expected decl, got {other:?}"),
        }
    }

    #[test]
    fn test_at_rules() {
        let root = parse_css("@import 'a.css' ;\n@media (min-width: 1px) {\n  a { b: c }\n}\n@font-face{}").unwrap();
        assert_eq!(root.nodes.len(), 3);
        match (&root.nodes[0], &root.nodes[1], &root.nodes[2]) {
            (Node::AtRule(import), Node::AtRule(media), Node::AtRule(face)) => {
                assert_eq!(import.name, "import");
                assert_eq!(import.params, "'a.css'");
                assert_eq!(import.raws.between.as_deref(), Some(" "));
                assert!(import.nodes.is_none());

                assert_eq!(media.params, "(min-width: 1px)");
                assert_eq!(media.nodes.as_ref().map(Vec::len), Some(1));

                assert_eq!(face.name, "font-face");
                assert_eq!(face.params, "");
                assert_eq!(face.nodes.as_ref().map(Vec::len), Some(0));
            }
            other => panic!("expected at-rules, got {other:?}"),
        }
    }

    #[test]
    fn test_root_level_declarations() {
        let root = parse_css("color: red;\nbackground: blue;\n").unwrap();
        assert_eq!(root.nodes.len(), 2);
        assert!(root.raws.semicolon);
        assert_eq!(root.raws.after.as_deref(), Some("\n"));
    }

    #[test]
    fn test_strings_and_parens_hide_delimiters() {
        let root = parse_css("a[title=\"}\"] { content: ';'; background: url(a;b) }").unwrap();
        let rule = first_rule(&root);
        assert_eq!(rule.selector, "a[title=\"}\"]");
        assert_eq!(rule.nodes.len(), 2);
    }

    #[test]
    fn test_parse_error_has_span() {
        let err = parse_css(".foo { color: red; }}").unwrap_err();
        assert!(err.message.starts_with("invalid CSS"));
        assert_eq!(err.span.start, 20);
        assert_eq!(err.hint.as_deref(), Some("this `}` has no matching `{`"));
    }

    #[test]
    fn test_unclosed_block_hint() {
        let err = parse_css(".foo { color: red;").unwrap_err();
        assert!(err.hint.is_some());
    }
}
