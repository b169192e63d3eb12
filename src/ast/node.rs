use super::raws::Raws;
use super::span::Span;

/// Top of a parsed stylesheet. Holds the nodes of one template body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub nodes: Vec<Node>,
    pub raws: Raws,
    pub source: Option<Span>,
}

/// The kinds of node a stylesheet is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `selector { ... }`
    Rule(Rule),
    /// `@name params;` or `@name params { ... }`
    AtRule(AtRule),
    /// `prop: value`
    Decl(Declaration),
    /// `/* text */`
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
    pub raws: Raws,
    pub source: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    /// `None` for statement at-rules such as `@import "a.css";`.
    pub nodes: Option<Vec<Node>>,
    pub raws: Raws,
    pub source: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
    pub raws: Raws,
    pub source: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment body with surrounding whitespace removed.
    pub text: String,
    pub raws: Raws,
    pub source: Option<Span>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            nodes: Vec::new(),
            raws: Raws::default(),
            source: None,
        }
    }
}

impl AtRule {
    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: None,
            raws: Raws::default(),
            source: None,
        }
    }
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            important: false,
            raws: Raws::default(),
            source: None,
        }
    }
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            raws: Raws::default(),
            source: None,
        }
    }
}

impl Node {
    /// Child nodes, if this node can contain any.
    pub fn nodes(&self) -> Option<&[Node]> {
        match self {
            Node::Rule(rule) => Some(&rule.nodes),
            Node::AtRule(at) => at.nodes.as_deref(),
            Node::Decl(_) | Node::Comment(_) => None,
        }
    }

    pub fn nodes_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Rule(rule) => Some(&mut rule.nodes),
            Node::AtRule(at) => at.nodes.as_mut(),
            Node::Decl(_) | Node::Comment(_) => None,
        }
    }

    pub fn raws(&self) -> &Raws {
        match self {
            Node::Rule(n) => &n.raws,
            Node::AtRule(n) => &n.raws,
            Node::Decl(n) => &n.raws,
            Node::Comment(n) => &n.raws,
        }
    }

    pub fn raws_mut(&mut self) -> &mut Raws {
        match self {
            Node::Rule(n) => &mut n.raws,
            Node::AtRule(n) => &mut n.raws,
            Node::Decl(n) => &mut n.raws,
            Node::Comment(n) => &mut n.raws,
        }
    }

    /// Offsets in the encoded CSS buffer, if the node came from the parser.
    pub fn source(&self) -> Option<Span> {
        match self {
            Node::Rule(n) => n.source,
            Node::AtRule(n) => n.source,
            Node::Decl(n) => n.source,
            Node::Comment(n) => n.source,
        }
    }

    /// Short type name, matching the usual CSS tooling vocabulary.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Rule(_) => "rule",
            Node::AtRule(_) => "atrule",
            Node::Decl(_) => "decl",
            Node::Comment(_) => "comment",
        }
    }

    /// Whether the stringifier terminates this node with `;`.
    pub(crate) fn takes_semicolon(&self) -> bool {
        match self {
            Node::Decl(_) => true,
            Node::AtRule(at) => at.nodes.is_none(),
            Node::Rule(_) | Node::Comment(_) => false,
        }
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl From<AtRule> for Node {
    fn from(at: AtRule) -> Self {
        Node::AtRule(at)
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Decl(decl)
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl Root {
    /// Visit every node depth-first, in source order.
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        walk_nodes(&self.nodes, f);
    }

    /// Visit every node mutably, depth-first, in source order.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        walk_nodes_mut(&mut self.nodes, f);
    }

    /// Visit every declaration.
    pub fn walk_decls(&self, f: &mut impl FnMut(&Declaration)) {
        self.walk(&mut |node| {
            if let Node::Decl(decl) = node {
                f(decl);
            }
        });
    }
}

fn walk_nodes(nodes: &[Node], f: &mut impl FnMut(&Node)) {
    for node in nodes {
        f(node);
        if let Some(children) = node.nodes() {
            walk_nodes(children, f);
        }
    }
}

fn walk_nodes_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut Node)) {
    for node in nodes {
        f(node);
        if let Some(children) = node.nodes_mut() {
            walk_nodes_mut(children, f);
        }
    }
}
