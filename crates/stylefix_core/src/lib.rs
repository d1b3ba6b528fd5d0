//! # stylefix_core
//!
//! Lint and format engine for stylefix.
//!
//! The engine normalizes line breaks, asks a [`Parser`] for a syntax tree
//! and walks it in pre-order, calling every registered [`Rule`] on every
//! node. Comment directives (`ktlint-disable` / `ktlint-enable`) suppress
//! rules over parts of the text. Violations are reported with line and
//! column numbers of the original text.
//!
//! In format mode rules that report auto-correctable violations also fix
//! them by editing the tree. The edited tree is written back with the line
//! separator of the input.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stylefix_core::{Engine, Rule, RuleContext, RuleError, RuleSet, TokenParser};
//!
//! struct NoTabs;
//!
//! impl Rule for NoTabs {
//!     fn id(&self) -> &str {
//!         "no-tabs"
//!     }
//!
//!     fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
//!         let node = ctx.node();
//!         let Some(text) = ctx.tree().node(node).text() else {
//!             return Ok(());
//!         };
//!         if ctx.tree().is_whitespace(node) && text.contains('\t') {
//!             let fixed = text.replace('\t', "    ");
//!             let offset = ctx.tree().start_offset(node);
//!             ctx.report(offset, "Tab character", true);
//!             if let Some(tree) = ctx.tree_mut() {
//!                 tree.set_text(node, fixed)?;
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let engine = Engine::new(Arc::new(TokenParser::new()));
//! let rules = [RuleSet::standard(vec![Arc::new(NoTabs)])];
//!
//! let errors = engine.lint_to_vec("{\n\tx\n}", &rules).unwrap();
//! assert_eq!(errors[0].to_string(), "1:2 Tab character (no-tabs)");
//!
//! let formatted = engine.format("{\r\n\tx\r\n}", &rules, |_, _| {}).unwrap();
//! assert_eq!(formatted, "{\r\n    x\r\n}");
//! ```

mod config;
mod diagnostic;
mod engine;
mod error;
mod line_separator;
mod position;
mod registry;
mod rule;
mod suppression;

pub use config::{EndOfLine, EngineConfig};
pub use diagnostic::LintError;
pub use engine::Engine;
pub use error::{EngineError, RulePanic};
pub use line_separator::{
    NATIVE_LINE_SEPARATOR, determine_line_separator, normalize_line_breaks, restore_line_breaks,
};
pub use position::PositionIndex;
pub use registry::{RuleRegistry, flatten, qualified_id};
pub use rule::{Rule, RuleContext, RuleError, RuleSet, STANDARD_RULE_SET_ID, Violation};
pub use suppression::{DISABLE_DIRECTIVE, ENABLE_DIRECTIVE, SuppressionHint, SuppressionIndex};

// Re-export the tree and parser types rules are written against
pub use stylefix_ast::{NodeId, NodeKind, Position, SyntaxTree};
pub use stylefix_parser::{ParseError, Parser, TokenParser};
