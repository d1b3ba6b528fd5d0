//! Shared rules and helpers for the engine integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use stylefix_core::{
    Engine, EngineConfig, LintError, NodeKind, Position, Rule, RuleContext, RuleError, RuleSet,
    TokenParser,
};

pub fn engine() -> Engine {
    Engine::new(Arc::new(TokenParser::new()))
}

pub fn engine_with(config: EngineConfig) -> Engine {
    Engine::with_config(Arc::new(TokenParser::new()), config)
}

pub fn standard(rules: Vec<Arc<dyn Rule>>) -> Vec<RuleSet> {
    vec![RuleSet::standard(rules)]
}

pub fn lint_error(line: usize, column: usize, rule_id: &str, message: &str) -> LintError {
    LintError::new(Position::new(line, column), rule_id, message)
}

/// Runs `format` and returns the output together with every reported
/// violation and its auto-correctable flag.
pub fn format_collecting(
    engine: &Engine,
    text: &str,
    rule_sets: &[RuleSet],
) -> (String, Vec<(LintError, bool)>) {
    let mut reported = Vec::new();
    let on_error = |error: LintError, corrected: bool| reported.push((error, corrected));
    let output = engine.format(text, rule_sets, on_error).unwrap();
    (output, reported)
}

fn leaf_text<'c>(ctx: &'c RuleContext<'_>) -> Option<&'c str> {
    ctx.tree().node(ctx.node()).text()
}

/// Reports and removes every `;` token.
pub struct NoSemicolons;

impl Rule for NoSemicolons {
    fn id(&self) -> &str {
        "no-semi"
    }

    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let node = ctx.node();
        if ctx.tree().kind(node) != NodeKind::Token || leaf_text(ctx) != Some(";") {
            return Ok(());
        }
        let offset = ctx.tree().start_offset(node);
        ctx.report(offset, "Unnecessary semicolon", true);
        if let Some(tree) = ctx.tree_mut() {
            tree.detach(node)?;
        }
        Ok(())
    }
}

/// Reports and strips spaces and tabs in front of a line break.
pub struct NoTrailingSpaces;

impl Rule for NoTrailingSpaces {
    fn id(&self) -> &str {
        "no-trailing-spaces"
    }

    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let node = ctx.node();
        if !ctx.tree().is_whitespace(node) {
            return Ok(());
        }
        let Some(text) = leaf_text(ctx) else {
            return Ok(());
        };

        let lines: Vec<&str> = text.split('\n').collect();
        let Some((last, terminated)) = lines.split_last() else {
            return Ok(());
        };
        let mut first_trailing = None;
        let mut line_offset = 0;
        for line in terminated {
            let trimmed = line.trim_end_matches([' ', '\t']);
            if trimmed.len() < line.len() && first_trailing.is_none() {
                first_trailing = Some(line_offset + trimmed.len());
            }
            line_offset += line.len() + 1;
        }
        let Some(relative) = first_trailing else {
            return Ok(());
        };

        let fixed: Vec<&str> = terminated
            .iter()
            .map(|line| line.trim_end_matches([' ', '\t']))
            .chain(std::iter::once(*last))
            .collect();
        let fixed = fixed.join("\n");
        let offset = ctx.tree().start_offset(node) + relative;

        ctx.report(offset, "Trailing space(s)", true);
        if let Some(tree) = ctx.tree_mut() {
            tree.set_text(node, fixed)?;
        }
        Ok(())
    }
}

/// Reports and removes every block comment.
pub struct NoBlockComments;

impl Rule for NoBlockComments {
    fn id(&self) -> &str {
        "no-block-comments"
    }

    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let node = ctx.node();
        if ctx.tree().kind(node) != NodeKind::BlockComment {
            return Ok(());
        }
        let offset = ctx.tree().start_offset(node);
        ctx.report(offset, "Block comment", true);
        if let Some(tree) = ctx.tree_mut() {
            tree.detach(node)?;
        }
        Ok(())
    }
}

/// Reports, without fixing, every identifier spelled `ident`.
pub struct ForbiddenIdent {
    pub id: &'static str,
    pub ident: &'static str,
}

impl Rule for ForbiddenIdent {
    fn id(&self) -> &str {
        self.id
    }

    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let node = ctx.node();
        if ctx.tree().label(node) != "IDENT" || leaf_text(ctx) != Some(self.ident) {
            return Ok(());
        }
        let offset = ctx.tree().start_offset(node);
        ctx.report(offset, format!("Unexpected '{}'", self.ident), false);
        Ok(())
    }
}

/// Fails, or panics, when visiting the identifier `ident`.
pub struct FailingRule {
    pub ident: &'static str,
    pub only_when_autocorrecting: bool,
    pub panic: bool,
}

impl FailingRule {
    pub fn on(ident: &'static str) -> Self {
        Self {
            ident,
            only_when_autocorrecting: false,
            panic: false,
        }
    }

    pub fn while_fixing(mut self) -> Self {
        self.only_when_autocorrecting = true;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }
}

impl Rule for FailingRule {
    fn id(&self) -> &str {
        "failing"
    }

    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        if leaf_text(ctx) != Some(self.ident) {
            return Ok(());
        }
        if self.only_when_autocorrecting && !ctx.autocorrect() {
            return Ok(());
        }
        if self.panic {
            panic!("cannot handle '{}'", self.ident);
        }
        Err(format!("cannot handle '{}'", self.ident).into())
    }
}

/// One recorded visit: rule id, node label and whether fixing was enabled.
pub type Visit = (String, String, bool);

/// Records every visit into a shared log.
pub struct Recorder {
    pub id: &'static str,
    pub log: Arc<Mutex<Vec<Visit>>>,
}

impl Recorder {
    pub fn new(id: &'static str, log: &Arc<Mutex<Vec<Visit>>>) -> Self {
        Self {
            id,
            log: Arc::clone(log),
        }
    }
}

impl Rule for Recorder {
    fn id(&self) -> &str {
        self.id
    }

    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let label = ctx.tree().label(ctx.node()).to_string();
        self.log
            .lock()
            .map_err(|e| e.to_string())?
            .push((self.id.to_string(), label, ctx.autocorrect()));
        Ok(())
    }
}

/// Reports the `indent_size` user data entry once, on the root node.
pub struct UserDataEcho;

impl Rule for UserDataEcho {
    fn id(&self) -> &str {
        "user-data"
    }

    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        if ctx.node() != ctx.tree().root() {
            return Ok(());
        }
        let indent_size = ctx.user_data("indent_size").unwrap_or("unset");
        let message = format!("indent_size={indent_size}");
        ctx.report(0, message, false);
        Ok(())
    }
}
