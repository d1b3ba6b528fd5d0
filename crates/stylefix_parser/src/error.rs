//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The source text is invalid.
    #[error("Invalid source: {message}")]
    InvalidSource {
        /// Error message.
        message: String,
        /// Byte offset where the error occurred.
        offset: Option<usize>,
    },

    /// An internal parser error occurred.
    #[error("Internal parser error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: None,
        }
    }

    /// Creates a new invalid source error with offset.
    pub fn invalid_source_at(message: impl Into<String>, offset: usize) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: Some(offset),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Byte offset of the error in the parsed text, if known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidSource { offset, .. } => *offset,
            Self::Internal(_) => None,
        }
    }

    /// Human readable description without the error category prefix.
    pub fn description(&self) -> &str {
        match self {
            Self::InvalidSource { message, .. } => message,
            Self::Internal(message) => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_source_at_keeps_offset() {
        let err = ParseError::invalid_source_at("Unexpected ')'", 7);
        assert_eq!(err.offset(), Some(7));
        assert_eq!(err.description(), "Unexpected ')'");
        assert_eq!(err.to_string(), "Invalid source: Unexpected ')'");
    }

    #[test]
    fn test_internal_has_no_offset() {
        let err = ParseError::internal("boom");
        assert_eq!(err.offset(), None);
        assert_eq!(err.to_string(), "Internal parser error: boom");
    }

    #[test]
    fn test_invalid_source_without_offset() {
        let err = ParseError::invalid_source("empty");
        assert_eq!(err.offset(), None);
    }
}
