//! Comment directives that suppress rules over a region of the text.
//!
//! Two forms are recognized:
//!
//! ```text
//! val x = 1 // ktlint-disable no-unused
//! /* ktlint-disable no-semi experimental:no-foo */
//! ...
//! /* ktlint-enable no-semi experimental:no-foo */
//! ```
//!
//! A line comment suppresses the listed rules from the start of its line up
//! to the comment. A block comment pair suppresses them from the disabling
//! comment to the matching enabling comment, or to the end of the text when
//! none follows. Listing no rules suppresses every rule.

use std::collections::BTreeSet;
use std::ops::{ControlFlow, RangeInclusive};

use stylefix_ast::visitor::{VisitResult, Visitor, walk_node};
use stylefix_ast::{NodeId, NodeKind, SyntaxTree};
use tracing::trace;

/// Directive that starts a suppressed region.
pub const DISABLE_DIRECTIVE: &str = "ktlint-disable";

/// Directive that ends a region opened by a block comment.
pub const ENABLE_DIRECTIVE: &str = "ktlint-enable";

/// A region of normalized text where some rules are suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionHint {
    /// Offsets covered, both ends inclusive.
    pub range: RangeInclusive<usize>,
    /// Qualified rule ids. Empty means every rule.
    pub disabled_rules: BTreeSet<String>,
}

impl SuppressionHint {
    /// Returns true if this hint covers `offset` for `rule_id`.
    pub fn suppresses(&self, offset: usize, rule_id: &str) -> bool {
        self.range.contains(&offset)
            && (self.disabled_rules.is_empty() || self.disabled_rules.contains(rule_id))
    }
}

/// All suppression hints of one syntax tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionIndex {
    hints: Vec<SuppressionHint>,
}

impl SuppressionIndex {
    /// Collects the hints of `tree` in a single pre-order pass.
    pub fn build(tree: &SyntaxTree) -> Self {
        let mut collector = HintCollector::default();
        let _ = walk_node(&mut collector, tree, tree.root());
        let text_len = tree.text_len(tree.root());
        let mut hints = collector.hints;
        hints.extend(collector.open.into_iter().map(|open| SuppressionHint {
            range: open.start..=text_len,
            disabled_rules: open.disabled_rules,
        }));
        trace!("Collected {} suppression hints", hints.len());
        Self { hints }
    }

    /// Returns true if `rule_id` is suppressed at `offset`.
    pub fn is_suppressed(&self, offset: usize, rule_id: &str) -> bool {
        if self.hints.is_empty() {
            return false;
        }
        self.hints.iter().any(|h| h.suppresses(offset, rule_id))
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn hints(&self) -> &[SuppressionHint] {
        &self.hints
    }
}

struct OpenHint {
    start: usize,
    disabled_rules: BTreeSet<String>,
}

#[derive(Default)]
struct HintCollector {
    line_start: usize,
    hints: Vec<SuppressionHint>,
    open: Vec<OpenHint>,
}

impl Visitor for HintCollector {
    fn visit(&mut self, tree: &SyntaxTree, node: NodeId) -> VisitResult {
        let current = tree.node(node);
        let Some(text) = current.text() else {
            return ControlFlow::Continue(());
        };
        let offset = tree.start_offset(node);

        match current.kind() {
            NodeKind::Whitespace => {
                if let Some(i) = text.rfind('\n') {
                    self.line_start = offset + i + 1;
                }
            }
            NodeKind::LineComment => {
                let body = text.strip_prefix("//").unwrap_or(text).trim();
                if let Some(disabled_rules) = parse_directive(body, DISABLE_DIRECTIVE) {
                    self.hints.push(SuppressionHint {
                        range: self.line_start..=offset,
                        disabled_rules,
                    });
                }
            }
            NodeKind::BlockComment => {
                let body = text.strip_prefix("/*").unwrap_or(text);
                let body = body.strip_suffix("*/").unwrap_or(body).trim();
                if let Some(disabled_rules) = parse_directive(body, DISABLE_DIRECTIVE) {
                    self.open.push(OpenHint {
                        start: offset,
                        disabled_rules,
                    });
                } else if let Some(enabled_rules) = parse_directive(body, ENABLE_DIRECTIVE) {
                    self.close(offset, &enabled_rules);
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}

impl HintCollector {
    /// Closes the most recently opened hint with exactly this rule set.
    /// Enables without a matching disable are ignored.
    fn close(&mut self, offset: usize, rules: &BTreeSet<String>) {
        if let Some(i) = self
            .open
            .iter()
            .rposition(|open| open.disabled_rules == *rules)
        {
            let open = self.open.remove(i);
            self.hints.push(SuppressionHint {
                range: open.start..=offset,
                disabled_rules: open.disabled_rules,
            });
        }
    }
}

/// Returns the listed rule ids if `body` starts with `directive` as a word.
fn parse_directive(body: &str, directive: &str) -> Option<BTreeSet<String>> {
    let mut words = body.split_whitespace();
    if words.next()? != directive {
        return None;
    }
    Some(words.map(str::to_owned).collect())
}
