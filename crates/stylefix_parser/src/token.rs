//! Grammar-free reference parser.
//!
//! Splits text into whitespace, `//` and `/* */` comments, string literals,
//! identifiers, numbers and punctuation. Matching `()`, `[]` and `{}` pairs
//! become elements so the resulting tree has some depth.

use stylefix_ast::{NodeId, NodeKind, SyntaxTree};

use crate::{ParseError, Parser};

/// Token based parser implementation.
///
/// Fails on unterminated block comments and string literals and on
/// unbalanced brackets; everything else is accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenParser;

impl TokenParser {
    /// Creates a new token parser.
    pub fn new() -> Self {
        Self
    }
}

/// An element opened by a bracket and not yet closed.
struct OpenGroup {
    element: NodeId,
    closer: char,
    offset: usize,
}

impl Parser for TokenParser {
    fn name(&self) -> &str {
        "token"
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut tree = SyntaxTree::new("file");
        let mut groups: Vec<OpenGroup> = Vec::new();
        let mut pos = 0;

        while let Some(c) = source[pos..].chars().next() {
            let rest = &source[pos..];
            let parent = groups.last().map_or(tree.root(), |group| group.element);

            if let Some((group_label, open_label, closer)) = opening(c) {
                let element = tree.new_element(NodeKind::Element, group_label);
                attach(&mut tree, parent, element)?;
                let open = tree.new_leaf(NodeKind::Token, open_label, &rest[..1]);
                attach(&mut tree, element, open)?;
                groups.push(OpenGroup {
                    element,
                    closer,
                    offset: pos,
                });
                pos += 1;
                continue;
            }

            if let Some(close_label) = closing(c) {
                let element = match groups.last() {
                    Some(group) if group.closer == c => group.element,
                    _ => {
                        return Err(ParseError::invalid_source_at(
                            format!("Unexpected '{c}'"),
                            pos,
                        ));
                    }
                };
                let close = tree.new_leaf(NodeKind::Token, close_label, &rest[..1]);
                attach(&mut tree, element, close)?;
                groups.pop();
                pos += 1;
                continue;
            }

            let (kind, label, len) = match lex(rest) {
                Ok(token) => token,
                Err(message) => return Err(ParseError::invalid_source_at(message, pos)),
            };
            let leaf = tree.new_leaf(kind, label, &rest[..len]);
            attach(&mut tree, parent, leaf)?;
            pos += len;
        }

        if let Some(group) = groups.last() {
            return Err(ParseError::invalid_source_at(
                format!("Unclosed bracket, expected '{}'", group.closer),
                group.offset,
            ));
        }

        Ok(tree)
    }
}

fn attach(tree: &mut SyntaxTree, parent: NodeId, child: NodeId) -> Result<(), ParseError> {
    tree.append_child(parent, child)
        .map_err(|e| ParseError::internal(e.to_string()))
}

fn opening(c: char) -> Option<(&'static str, &'static str, char)> {
    match c {
        '(' => Some(("PARENS", "LPAR", ')')),
        '[' => Some(("BRACKETS", "LBRACKET", ']')),
        '{' => Some(("BRACES", "LBRACE", '}')),
        _ => None,
    }
}

fn closing(c: char) -> Option<&'static str> {
    match c {
        ')' => Some("RPAR"),
        ']' => Some("RBRACKET"),
        '}' => Some("RBRACE"),
        _ => None,
    }
}

/// Lexes one leaf at the start of `rest`, returning its kind, label and byte length.
fn lex(rest: &str) -> Result<(NodeKind, &'static str, usize), &'static str> {
    let Some(c) = rest.chars().next() else {
        return Err("Unexpected end of input");
    };

    if c.is_whitespace() {
        let len = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        return Ok((NodeKind::Whitespace, "WHITE_SPACE", len));
    }

    if rest.starts_with("//") {
        let len = rest.find('\n').unwrap_or(rest.len());
        return Ok((NodeKind::LineComment, "EOL_COMMENT", len));
    }

    if rest.starts_with("/*") {
        let len = rest[2..]
            .find("*/")
            .map(|end| end + 4)
            .ok_or("Unterminated block comment")?;
        return Ok((NodeKind::BlockComment, "BLOCK_COMMENT", len));
    }

    if c == '"' {
        return lex_string(rest).map(|len| (NodeKind::Token, "STRING", len));
    }

    if c.is_alphabetic() || c == '_' {
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        return Ok((NodeKind::Token, "IDENT", len));
    }

    if c.is_ascii_digit() {
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_'))
            .unwrap_or(rest.len());
        return Ok((NodeKind::Token, "NUMBER", len));
    }

    Ok((NodeKind::Token, "PUNCT", c.len_utf8()))
}

fn lex_string(rest: &str) -> Result<usize, &'static str> {
    let mut escaped = false;
    for (i, c) in rest.char_indices().skip(1) {
        match c {
            '\n' => break,
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Ok(i + 1),
            _ => escaped = false,
        }
    }
    Err("Unterminated string literal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn leaves(tree: &SyntaxTree) -> Vec<(NodeKind, &str, &str)> {
        tree.descendants(tree.root())
            .filter_map(|id| {
                let node = tree.node(id);
                node.text().map(|text| (node.kind(), node.label(), text))
            })
            .collect()
    }

    #[rstest]
    #[case::empty("")]
    #[case::plain("val x = 1\n")]
    #[case::comments("a // line\n/* block\n spans */ b")]
    #[case::nested("f(g[1], { h })")]
    #[case::unicode("naïve = \"ça va\" // 日本語")]
    #[case::escaped_quote(r#"s = "a \" b""#)]
    fn test_text_round_trip(#[case] source: &str) {
        let tree = TokenParser::new().parse(source).unwrap();
        assert_eq!(tree.text(), source);
    }

    #[test]
    fn test_leaf_kinds() {
        let tree = TokenParser::new()
            .parse("val x = 1 // note\n/* b */")
            .unwrap();

        assert_eq!(
            leaves(&tree),
            vec![
                (NodeKind::Token, "IDENT", "val"),
                (NodeKind::Whitespace, "WHITE_SPACE", " "),
                (NodeKind::Token, "IDENT", "x"),
                (NodeKind::Whitespace, "WHITE_SPACE", " "),
                (NodeKind::Token, "PUNCT", "="),
                (NodeKind::Whitespace, "WHITE_SPACE", " "),
                (NodeKind::Token, "NUMBER", "1"),
                (NodeKind::Whitespace, "WHITE_SPACE", " "),
                (NodeKind::LineComment, "EOL_COMMENT", "// note"),
                (NodeKind::Whitespace, "WHITE_SPACE", "\n"),
                (NodeKind::BlockComment, "BLOCK_COMMENT", "/* b */"),
            ]
        );
    }

    #[test]
    fn test_brackets_become_elements() {
        let tree = TokenParser::new().parse("f(a)").unwrap();
        let root = tree.root();
        let children = tree.children(root);

        assert_eq!(children.len(), 2);
        let group = children[1];
        assert_eq!(tree.kind(group), NodeKind::Element);
        assert_eq!(tree.label(group), "PARENS");
        assert_eq!(tree.text_of(group), "(a)");
        assert_eq!(tree.start_offset(group), 1);
        assert_eq!(tree.children(group).len(), 3);
    }

    #[rstest]
    #[case::unterminated_block("a /* open", 2, "Unterminated block comment")]
    #[case::unterminated_string("x = \"abc\n", 4, "Unterminated string literal")]
    #[case::unexpected_close("a)", 1, "Unexpected ')'")]
    #[case::mismatched_close("(a]", 2, "Unexpected ']'")]
    #[case::unclosed("f(a, {b}", 1, "Unclosed bracket, expected ')'")]
    fn test_syntax_errors(#[case] source: &str, #[case] offset: usize, #[case] message: &str) {
        let err = TokenParser::new().parse(source).unwrap_err();
        assert_eq!(err, ParseError::invalid_source_at(message, offset));
    }

    #[test]
    fn test_line_comment_stops_before_newline() {
        let tree = TokenParser::new().parse("// a\nb").unwrap();
        let comment = tree.children(tree.root())[0];
        assert_eq!(tree.node(comment).text(), Some("// a"));
    }

    #[test]
    fn test_name() {
        assert_eq!(TokenParser::new().name(), "token");
    }
}
