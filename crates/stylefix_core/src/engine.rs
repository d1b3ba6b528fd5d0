//! Lint and format entry points.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use stylefix_ast::visitor::{walk, walk_mut};
use stylefix_ast::{Position, SyntaxTree};
use stylefix_parser::Parser;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::diagnostic::LintError;
use crate::error::{EngineError, RulePanic};
use crate::line_separator::{normalize_line_breaks, restore_line_breaks};
use crate::position::PositionIndex;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleContext, RuleError, RuleSet};
use crate::suppression::SuppressionIndex;

/// Runs rule sets over source text.
///
/// An engine holds no per-call state, so one instance can serve any number
/// of calls, from any number of threads.
///
/// # Rule panics
///
/// A panicking rule does not unwind out of [`Engine::lint`] or
/// [`Engine::format`]; the call returns [`EngineError::RuleExecution`] with a
/// [`RulePanic`] source instead. The process panic hook still runs before
/// the panic is caught, so with the default hook each rule panic is also
/// printed to stderr. Callers that report the error themselves can install
/// a quieter hook with [`std::panic::set_hook`].
#[derive(Clone)]
pub struct Engine {
    parser: Arc<dyn Parser>,
    config: EngineConfig,
}

/// A parsed input ready for traversal.
struct Prepared<'a> {
    tree: SyntaxTree,
    positions: PositionIndex<'a>,
    suppression: SuppressionIndex,
}

impl Engine {
    /// Creates an engine with the default configuration.
    pub fn new(parser: Arc<dyn Parser>) -> Self {
        Self::with_config(parser, EngineConfig::default())
    }

    pub fn with_config(parser: Arc<dyn Parser>, config: EngineConfig) -> Self {
        Self { parser, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }

    /// Reports every violation in `text` to `on_error`.
    ///
    /// Rules run read-only. Violations arrive in traversal order: by node,
    /// then by rule. A failing or panicking rule aborts the call, see
    /// [rule panics](Engine#rule-panics).
    pub fn lint(
        &self,
        text: &str,
        rule_sets: &[RuleSet],
        mut on_error: impl FnMut(LintError),
    ) -> Result<(), EngineError> {
        let registry = RuleRegistry::from_rule_sets_with(rule_sets, &self.config);
        let prepared = self.prepare(text)?;
        debug!(
            "Linting with {} rules and {} suppression hints",
            registry.len(),
            prepared.suppression.hints().len()
        );
        self.detect(
            &prepared,
            &registry,
            &mut |error: LintError, _: bool| on_error(error),
        )?;
        Ok(())
    }

    /// Collects every violation in `text`.
    pub fn lint_to_vec(
        &self,
        text: &str,
        rule_sets: &[RuleSet],
    ) -> Result<Vec<LintError>, EngineError> {
        let mut errors = Vec::new();
        self.lint(text, rule_sets, |error| errors.push(error))?;
        Ok(errors)
    }

    /// Reports every violation in `text` and returns the text with the
    /// auto-correctable ones fixed.
    ///
    /// `on_error` receives each violation found before fixing, together with
    /// whether it is auto-correctable. When nothing is, `text` is returned
    /// unchanged. Otherwise rules fix the tree in a single pass and the
    /// result is written with the line separator of `text`, or the one
    /// configured. Rule failures abort the call as in [`Engine::lint`].
    pub fn format(
        &self,
        text: &str,
        rule_sets: &[RuleSet],
        mut on_error: impl FnMut(LintError, bool),
    ) -> Result<String, EngineError> {
        let registry = RuleRegistry::from_rule_sets_with(rule_sets, &self.config);
        let mut prepared = self.prepare(text)?;
        debug!(
            "Formatting with {} rules and {} suppression hints",
            registry.len(),
            prepared.suppression.hints().len()
        );

        let autocorrectable = self.detect(&prepared, &registry, &mut on_error)?;
        if !autocorrectable {
            debug!("No auto-correctable violations, skipping fix pass");
            return Ok(text.to_string());
        }

        self.fix(&mut prepared.tree, &mut prepared.suppression, &registry)?;
        Ok(restore_line_breaks(
            &prepared.tree.text(),
            text,
            self.config.end_of_line,
        ))
    }

    fn prepare<'a>(&self, text: &'a str) -> Result<Prepared<'a>, EngineError> {
        let positions = PositionIndex::new(text);
        let normalized = normalize_line_breaks(text);
        let tree = self.parser.parse(&normalized).map_err(|e| {
            let position = e
                .offset()
                .and_then(|offset| positions.resolve(offset))
                .unwrap_or(Position::UNKNOWN);
            EngineError::parse(position, e)
        })?;

        if self.config.debug {
            match serde_json::to_string_pretty(&tree.view(tree.root())) {
                Ok(dump) => debug!("Parsed tree ({}):\n{}", self.parser.name(), dump),
                Err(e) => warn!("Failed to serialize syntax tree: {}", e),
            }
        }

        let suppression = SuppressionIndex::build(&tree);
        Ok(Prepared {
            tree,
            positions,
            suppression,
        })
    }

    /// Runs every rule read-only. Returns whether any violation was
    /// auto-correctable.
    fn detect(
        &self,
        prepared: &Prepared<'_>,
        registry: &RuleRegistry,
        on_error: &mut dyn FnMut(LintError, bool),
    ) -> Result<bool, EngineError> {
        let Prepared {
            tree,
            positions,
            suppression,
        } = prepared;
        let mut autocorrectable = false;

        let flow = walk(tree, tree.root(), |tree, node| {
            let offset = tree.start_offset(node);
            for (rule_id, rule) in registry.iter() {
                if suppression.is_suppressed(offset, rule_id) {
                    continue;
                }
                let mut ctx = RuleContext::read_only(tree, node, &self.config.user_data);
                if let Err(source) = invoke(rule, &mut ctx) {
                    let position = positions.resolve(offset).unwrap_or(Position::UNKNOWN);
                    return ControlFlow::Break(EngineError::rule_execution(
                        rule_id,
                        position,
                        source,
                    ));
                }
                for violation in ctx.into_violations() {
                    let Some(position) = positions.resolve(violation.offset) else {
                        return ControlFlow::Break(EngineError::internal(format!(
                            "Rule '{}' reported offset {} outside of the text",
                            rule_id, violation.offset
                        )));
                    };
                    autocorrectable |= violation.can_be_auto_corrected;
                    on_error(
                        LintError::new(position, rule_id, violation.message),
                        violation.can_be_auto_corrected,
                    );
                }
            }
            ControlFlow::Continue(())
        });

        match flow {
            ControlFlow::Break(e) => Err(e),
            ControlFlow::Continue(()) => Ok(autocorrectable),
        }
    }

    /// Runs every rule in fix mode, rebuilding the suppression hints after
    /// each auto-correctable report.
    fn fix(
        &self,
        tree: &mut SyntaxTree,
        suppression: &mut SuppressionIndex,
        registry: &RuleRegistry,
    ) -> Result<(), EngineError> {
        let user_data: &BTreeMap<String, String> = &self.config.user_data;
        let mut rebuilds = 0usize;
        let root = tree.root();

        let flow = walk_mut(tree, root, |tree, node| {
            for (rule_id, rule) in registry.iter() {
                // An earlier rule may have removed the node.
                if !tree.is_attached(node) {
                    break;
                }
                if suppression.is_suppressed(tree.start_offset(node), rule_id) {
                    continue;
                }
                let mut ctx = RuleContext::autocorrecting(tree, node, user_data);
                let result = invoke(rule, &mut ctx);
                let violations = ctx.into_violations();
                if let Err(source) = result {
                    return ControlFlow::Break(EngineError::rule_execution(
                        rule_id,
                        Position::UNKNOWN,
                        source,
                    ));
                }
                if !suppression.is_empty() && violations.iter().any(|v| v.can_be_auto_corrected) {
                    *suppression = SuppressionIndex::build(tree);
                    rebuilds += 1;
                }
            }
            ControlFlow::Continue(())
        });

        debug!("Fix pass done, suppression hints rebuilt {rebuilds} times");
        match flow {
            ControlFlow::Break(e) => Err(e),
            ControlFlow::Continue(()) => Ok(()),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("parser", &self.parser.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Calls the rule, turning a panic into an error.
fn invoke(rule: &dyn Rule, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.visit(ctx))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(Box::new(RulePanic(message)))
        }
    }
}
