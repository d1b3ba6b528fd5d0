//! Parser trait definition.

use stylefix_ast::SyntaxTree;

use crate::ParseError;

/// Trait for parsing source text into a [`SyntaxTree`].
///
/// A parser is constructed once by the caller and shared by every lint or
/// format call, possibly from several threads, hence the `Send + Sync`
/// bound.
///
/// # Example
///
/// ```rust
/// use stylefix_ast::{NodeKind, SyntaxTree};
/// use stylefix_parser::{ParseError, Parser};
///
/// struct SingleTokenParser;
///
/// impl Parser for SingleTokenParser {
///     fn name(&self) -> &str {
///         "single-token"
///     }
///
///     fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
///         let mut tree = SyntaxTree::new("file");
///         let root = tree.root();
///         let token = tree.new_leaf(NodeKind::Token, "TEXT", source);
///         tree.append_child(root, token)
///             .map_err(|e| ParseError::internal(e.to_string()))?;
///         Ok(tree)
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Parses the source text into a syntax tree.
    ///
    /// `source` uses `\n` line breaks only. The concatenated leaf text of the
    /// returned tree must equal `source` exactly, so that offsets reported by
    /// the tree are offsets into `source`.
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;
}
