//! # stylefix_parser
//!
//! Parser abstraction layer for stylefix.
//!
//! This crate provides:
//! - A `Parser` trait the lint engine uses to turn text into a `SyntaxTree`
//! - `TokenParser`, a small grammar-free parser that recognizes whitespace,
//!   line and block comments, string literals, bracket groups and tokens
//!
//! ## Architecture
//!
//! Parsers always receive text whose line breaks were normalized to `\n`
//! and report offsets in that text. Mapping them back to the caller's
//! original coordinates is the engine's job.
//!
//! ## Example
//!
//! ```rust
//! use stylefix_parser::{Parser, TokenParser};
//!
//! let parser = TokenParser::new();
//! let tree = parser.parse("call(a, b) // trailing\n").unwrap();
//!
//! assert_eq!(tree.text(), "call(a, b) // trailing\n");
//! ```

mod error;
mod token;
mod traits;

pub use error::ParseError;
pub use token::TokenParser;
pub use traits::Parser;
