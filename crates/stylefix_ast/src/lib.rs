//! # stylefix_ast
//!
//! Syntax tree definitions for stylefix.
//!
//! The tree is produced by a parser, inspected by lint rules and, when the
//! engine runs in format mode, rewritten in place by those rules. It is
//! language agnostic: the engine itself only distinguishes comments and
//! whitespace, every other node carries a free-form label chosen by the
//! parser.
//!
//! ## Architecture
//!
//! - Nodes live in a single index arena owned by [`SyntaxTree`]
//! - Nodes are addressed by [`NodeId`], stable for the lifetime of the tree
//! - Leaves own their text; element offsets are derived from the leaves
//! - Offsets are computed lazily and invalidated by every mutation
//!
//! ## Example
//!
//! ```rust
//! use stylefix_ast::{NodeKind, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new("file");
//! let root = tree.root();
//! let ident = tree.new_leaf(NodeKind::Token, "IDENT", "answer");
//! tree.append_child(root, ident).unwrap();
//! let ws = tree.new_leaf(NodeKind::Whitespace, "WHITE_SPACE", " ");
//! tree.append_child(root, ws).unwrap();
//!
//! assert_eq!(tree.text(), "answer ");
//! assert_eq!(tree.start_offset(ws), 6);
//! ```

mod error;
mod kind;
mod span;
mod tree;
pub mod visitor;

pub use error::TreeError;
pub use kind::NodeKind;
pub use span::{Position, Span};
pub use tree::{Descendants, Node, NodeId, NodeView, SyntaxTree};

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor};
