//! Node tree for embedded stylesheets.
//!
//! The tree follows the shape generic CSS tooling expects: a [`Root`]
//! holding rules, at-rules, declarations, and comments, each with an ordered
//! child list, a [`Raws`] bag of formatting text, and an optional source
//! [`Span`] into the encoded CSS buffer. Placeholder comments are ordinary
//! nodes or raw text here; only the stringifier knows about them.

pub mod node;
pub mod raws;
pub mod span;

// Convenience re-exports
pub use node::{AtRule, Comment, Declaration, Node, Root, Rule};
pub use raws::{RawValue, Raws};
pub use span::{Position, Span, Spanned};
