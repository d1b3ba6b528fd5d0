//! Violation records handed to callers.

use serde::{Deserialize, Serialize};
use stylefix_ast::Position;

/// A style violation, located in the text the caller passed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LintError {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Qualified id of the reporting rule.
    pub rule_id: String,
    pub message: String,
}

impl LintError {
    pub fn new(position: Position, rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: position.line,
            column: position.column,
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl std::fmt::Display for LintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} {} ({})",
            self.line, self.column, self.message, self.rule_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = LintError::new(Position::new(2, 14), "no-semi", "Unnecessary semicolon");
        assert_eq!(error.to_string(), "2:14 Unnecessary semicolon (no-semi)");
    }

    #[test]
    fn test_serialization() {
        let error = LintError::new(Position::new(1, 3), "experimental:no-foo", "foo");
        insta::assert_json_snapshot!(error, @r#"
        {
          "line": 1,
          "column": 3,
          "rule_id": "experimental:no-foo",
          "message": "foo"
        }
        "#);
    }
}
