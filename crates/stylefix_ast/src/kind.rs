//! Node kinds.
//!
//! The engine is grammar agnostic. It only needs to tell comments and
//! whitespace apart from everything else, and leaves (which own text) apart
//! from elements (which own children). Anything grammar specific goes in the
//! node label.

use serde::{Deserialize, Serialize};

/// Structural kind of a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of a parsed file.
    File,
    /// Composite node grouping other nodes.
    Element,
    /// Any leaf that is neither whitespace nor a comment.
    Token,
    /// Run of whitespace, including line breaks.
    Whitespace,
    /// Comment running to the end of the line, e.g. `// ...`.
    LineComment,
    /// Delimited comment, e.g. `/* ... */`.
    BlockComment,
}

impl NodeKind {
    /// Returns true if nodes of this kind own text instead of children.
    pub const fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Token | NodeKind::Whitespace | NodeKind::LineComment | NodeKind::BlockComment
        )
    }

    /// Returns true for line and block comments.
    pub const fn is_comment(&self) -> bool {
        matches!(self, NodeKind::LineComment | NodeKind::BlockComment)
    }

    /// Returns true for whitespace.
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, NodeKind::Whitespace)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::File => "file",
            NodeKind::Element => "element",
            NodeKind::Token => "token",
            NodeKind::Whitespace => "whitespace",
            NodeKind::LineComment => "line_comment",
            NodeKind::BlockComment => "block_comment",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NodeKind::File, false)]
    #[case(NodeKind::Element, false)]
    #[case(NodeKind::Token, true)]
    #[case(NodeKind::Whitespace, true)]
    #[case(NodeKind::LineComment, true)]
    #[case(NodeKind::BlockComment, true)]
    fn test_is_leaf(#[case] kind: NodeKind, #[case] expected: bool) {
        assert_eq!(kind.is_leaf(), expected);
    }

    #[test]
    fn test_is_comment() {
        assert!(NodeKind::LineComment.is_comment());
        assert!(NodeKind::BlockComment.is_comment());
        assert!(!NodeKind::Whitespace.is_comment());
        assert!(!NodeKind::Token.is_comment());
    }

    #[test]
    fn test_is_whitespace() {
        assert!(NodeKind::Whitespace.is_whitespace());
        assert!(!NodeKind::Token.is_whitespace());
    }

    #[test]
    fn test_display_matches_serde_name() {
        let json = serde_json::to_string(&NodeKind::BlockComment).unwrap();
        assert_eq!(json, format!("\"{}\"", NodeKind::BlockComment));
    }
}
