//! # csslit
//!
//! Lossless parsing and stringifying of CSS that lives inside JavaScript or
//! TypeScript tagged template literals (`` css`...` ``).
//!
//! Template bodies are not valid CSS while they contain `${...}`
//! interpolations. Each interpolation is therefore swapped for a comment of
//! the form `/*POSTCSS_LIT:N*/`, the result is parsed by an ordinary CSS
//! parser, and the stringifier swaps the comments back on the way out. An
//! unchanged tree reproduces the original source byte for byte.
//!
//! The crate is split into layers that can be used on their own:
//!
//! - **Discovery** ([`scan`]) finds tagged templates in host source.
//! - **Encoding** ([`encode`]) turns one template into parseable CSS plus
//!   an [`ExpressionTable`].
//! - **CSS** ([`parse_css`], [`to_css`]) parses and prints a node tree with
//!   full formatting raws.
//! - **Restoration** ([`Restorer`]) puts interpolations back while
//!   stringifying.
//!
//! ## Quick start
//!
//! ```rust
//! use csslit::{LitOptions, Node, parse_document};
//!
//! let src = "const button = css`\n  .btn { ${base}color: hotpink; }\n`;\n";
//! let mut doc = parse_document(src, &LitOptions::new()).unwrap();
//!
//! let root = &mut doc.sheets[0].sheet.root;
//! root.walk_mut(&mut |node| {
//!     if let Node::Decl(decl) = node {
//!         decl.value = "rebeccapurple".into();
//!     }
//! });
//!
//! assert_eq!(
//!     doc.to_source_string(),
//!     "const button = css`\n  .btn { ${base}color: rebeccapurple; }\n`;\n",
//! );
//! ```
//!
//! ## Single templates
//!
//! When the host code has already been parsed elsewhere, hand the template
//! pieces over directly:
//!
//! ```rust
//! use csslit::{LitOptions, TemplateSpan, parse_template};
//!
//! let template = TemplateSpan::new(
//!     vec![".foo { ".into(), "color: hotpink; }".into()],
//!     vec!["expr".into()],
//! ).unwrap();
//! let sheet = parse_template(&template, &LitOptions::new()).unwrap();
//! assert_eq!(sheet.to_template_string(), ".foo { ${expr}color: hotpink; }");
//! ```
//!
//! ## Options
//!
//! [`LitOptions`] selects which tags count as CSS and which placeholder
//! prefix to use. It can be built in code or read from TOML:
//!
//! ```rust
//! use csslit::LitOptions;
//!
//! let opts = LitOptions::from_toml_str(r#"
//!     tags = ["css", "styled"]
//!     placeholder_prefix = "LIT"
//! "#).unwrap();
//! assert!(opts.matches_tag("theme.styled"));
//! assert_eq!(opts.placeholder_prefix, "LIT");
//! ```

pub mod ast;
pub mod document;
pub mod error;
pub mod options;
mod parser;
pub mod placeholder;
pub mod stringify;
pub mod template;

pub use ast::{AtRule, Comment, Declaration, Node, Position, RawValue, Raws, Root, Rule, Span, Spanned};
pub use document::{Document, EmbeddedSheet, StyleSheet, parse_document, parse_template, parse_template_str};
pub use error::{ConfigError, LitError, ParseError, ScanError, ScanErrorKind};
pub use options::LitOptions;
pub use parser::parse_css;
pub use placeholder::{
    DEFAULT_PREFIX, Encoded, Expression, ExpressionTable, PlaceholderPattern, PlaceholderSite, encode,
    inline_placeholder, placeholder,
};
pub use stringify::{Builder, Restorer, stringify, to_css};
pub use template::{TaggedTemplate, TemplateSpan, scan};
