//! Turn a node tree back into CSS text.
//!
//! Output goes to a [`Builder`] one chunk at a time: a selector, a raw, a
//! whole comment. Chunk boundaries never fall inside a node's text or a
//! comment, which is what lets [`Restorer`] substitute placeholders chunk by
//! chunk without buffering.
//!
//! Raws recorded by the parser are written back verbatim, so an untouched
//! tree reproduces its input exactly. Nodes built by hand fall back to the
//! defaults below.

use crate::ast::{AtRule, Comment, Declaration, Node, RawValue, Root, Rule};

mod restore;

pub use restore::Restorer;

const DEFAULT_BEFORE: &str = "\n";
const DEFAULT_DECL_BETWEEN: &str = ": ";
const DEFAULT_BLOCK_BETWEEN: &str = " ";
const DEFAULT_BLOCK_AFTER: &str = "\n";
const DEFAULT_COMMENT_PADDING: &str = " ";
const DEFAULT_IMPORTANT: &str = " !important";

/// Sink for stringifier output.
pub trait Builder {
    fn append(&mut self, chunk: &str);
}

impl Builder for String {
    fn append(&mut self, chunk: &str) {
        self.push_str(chunk);
    }
}

impl<B: Builder + ?Sized> Builder for &mut B {
    fn append(&mut self, chunk: &str) {
        (**self).append(chunk);
    }
}

/// Write `root` to `builder`.
pub fn stringify(root: &Root, builder: &mut impl Builder) {
    let mut s = Stringifier { builder };
    s.body(&root.nodes, root.raws.semicolon, true);
    s.raw(root.raws.after.as_deref(), "");
}

/// Stringify `root` into a new string. Placeholders are left as they are.
pub fn to_css(root: &Root) -> String {
    let mut out = String::new();
    stringify(root, &mut out);
    out
}

struct Stringifier<'b, B: Builder> {
    builder: &'b mut B,
}

impl<B: Builder> Stringifier<'_, B> {
    fn push(&mut self, chunk: &str) {
        if !chunk.is_empty() {
            self.builder.append(chunk);
        }
    }

    fn raw(&mut self, raw: Option<&str>, default: &str) {
        self.push(raw.unwrap_or(default));
    }

    /// Children of a root or block. A node that takes `;` gets one unless
    /// it is the last child of a container whose source left it off.
    fn body(&mut self, nodes: &[Node], semicolon: bool, is_root: bool) {
        let last = nodes.len().saturating_sub(1);
        for (i, node) in nodes.iter().enumerate() {
            let default_before = if is_root && i == 0 { "" } else { DEFAULT_BEFORE };
            self.raw(node.raws().before.as_deref(), default_before);
            let terminate = node.takes_semicolon() && (i != last || semicolon);
            self.node(node, terminate);
        }
    }

    fn node(&mut self, node: &Node, semicolon: bool) {
        match node {
            Node::Rule(rule) => self.rule(rule),
            Node::AtRule(at) => self.at_rule(at, semicolon),
            Node::Decl(decl) => self.decl(decl, semicolon),
            Node::Comment(comment) => self.comment(comment),
        }
    }

    fn rule(&mut self, rule: &Rule) {
        self.push(&rule.selector);
        self.raw(rule.raws.between.as_deref(), DEFAULT_BLOCK_BETWEEN);
        self.block(&rule.nodes, rule.raws.after.as_deref(), rule.raws.semicolon);
    }

    fn at_rule(&mut self, at: &AtRule, semicolon: bool) {
        self.push("@");
        self.push(&at.name);
        if !at.params.is_empty() {
            self.raw(at.raws.after_name.as_deref(), " ");
            self.push(&at.params);
        }

        match &at.nodes {
            Some(nodes) => {
                self.raw(at.raws.between.as_deref(), DEFAULT_BLOCK_BETWEEN);
                self.block(nodes, at.raws.after.as_deref(), at.raws.semicolon);
            }
            None => {
                self.raw(at.raws.between.as_deref(), "");
                if semicolon {
                    self.push(";");
                }
            }
        }
    }

    fn block(&mut self, nodes: &[Node], after: Option<&str>, semicolon: bool) {
        self.push("{");
        self.body(nodes, semicolon, false);
        let default_after = if nodes.is_empty() { "" } else { DEFAULT_BLOCK_AFTER };
        self.raw(after, default_after);
        self.push("}");
    }

    fn decl(&mut self, decl: &Declaration, semicolon: bool) {
        self.push(&decl.prop);
        self.raw(decl.raws.between.as_deref(), DEFAULT_DECL_BETWEEN);
        self.push(RawValue::resolve(decl.raws.value.as_ref(), &decl.value));
        if decl.important {
            self.raw(decl.raws.important.as_deref(), DEFAULT_IMPORTANT);
        }
        if semicolon {
            self.push(";");
        }
    }

    fn comment(&mut self, comment: &Comment) {
        let left = comment.raws.left.as_deref().unwrap_or(DEFAULT_COMMENT_PADDING);
        let right = comment.raws.right.as_deref().unwrap_or(DEFAULT_COMMENT_PADDING);
        // One chunk, so a placeholder comment is always seen whole.
        self.push(&format!("/*{left}{}{right}*/", comment.text));
    }
}
