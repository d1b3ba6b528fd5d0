//! Engine error types.

use stylefix_ast::Position;
use stylefix_parser::ParseError;
use thiserror::Error;

use crate::rule::RuleError;

/// Errors that abort a lint or format call.
///
/// Style violations are never errors; they are delivered through the
/// caller's callback as [`LintError`](crate::LintError) values.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input is not syntactically valid. No rule ran.
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        /// 1-based line in the original text, 0 if unknown.
        line: usize,
        /// 1-based column in the original text, 0 if unknown.
        column: usize,
        /// Parser supplied description.
        message: String,
        #[source]
        source: ParseError,
    },

    /// A rule failed or panicked while visiting a node.
    ///
    /// Failures raised while fixing carry the position `0:0`, because the
    /// node may no longer be where it was in the original text.
    #[error("Rule '{rule_id}' failed at {line}:{column}: {source}")]
    RuleExecution {
        /// Qualified id of the failing rule.
        rule_id: String,
        /// 1-based line of the visited node, 0 if unknown.
        line: usize,
        /// 1-based column of the visited node, 0 if unknown.
        column: usize,
        #[source]
        source: RuleError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal consistency error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a parse error located at `position`.
    pub fn parse(position: Position, source: ParseError) -> Self {
        Self::Parse {
            line: position.line,
            column: position.column,
            message: source.description().to_string(),
            source,
        }
    }

    /// Creates a rule execution error located at `position`.
    pub fn rule_execution(
        rule_id: impl Into<String>,
        position: Position,
        source: RuleError,
    ) -> Self {
        Self::RuleExecution {
            rule_id: rule_id.into(),
            line: position.line,
            column: position.column,
            source,
        }
    }

    /// Position attached to parse and rule execution errors.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Parse { line, column, .. } | Self::RuleExecution { line, column, .. } => {
                Some(Position::new(*line, *column))
            }
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => None,
        }
    }
}

/// A rule panicked instead of returning an error.
#[derive(Debug, Error)]
#[error("rule panicked: {0}")]
pub struct RulePanic(pub String);
