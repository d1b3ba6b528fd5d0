//! Rule API.
//!
//! A [`Rule`] is called once for every node of the syntax tree, in pre-order.
//! It reports violations through its [`RuleContext`]. When the engine runs
//! in format mode the context also hands out mutable access to the tree, and
//! the rule is expected to fix what it reports as auto-correctable.
//!
//! # Example
//!
//! ```rust
//! use stylefix_core::{Rule, RuleContext, RuleError};
//!
//! struct NoSemicolons;
//!
//! impl Rule for NoSemicolons {
//!     fn id(&self) -> &str {
//!         "no-semi"
//!     }
//!
//!     fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
//!         let node = ctx.node();
//!         if ctx.tree().node(node).text() != Some(";") {
//!             return Ok(());
//!         }
//!         let offset = ctx.tree().start_offset(node);
//!         ctx.report(offset, "Unnecessary semicolon", true);
//!         if let Some(tree) = ctx.tree_mut() {
//!             tree.detach(node)?;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use stylefix_ast::{NodeId, SyntaxTree};

/// Id of the rule set whose rules are addressed without a prefix.
pub const STANDARD_RULE_SET_ID: &str = "standard";

/// Error a rule may return from [`Rule::visit`].
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// A style rule.
pub trait Rule: Send + Sync {
    /// Rule id, unique within its rule set.
    fn id(&self) -> &str;

    /// Inspects, and in format mode fixes, the node of `ctx`.
    fn visit(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError>;
}

/// A violation reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offset in the normalized text.
    pub offset: usize,
    pub message: String,
    pub can_be_auto_corrected: bool,
}

enum TreeAccess<'t> {
    Shared(&'t SyntaxTree),
    Exclusive(&'t mut SyntaxTree),
}

/// What a rule sees of the current visit.
pub struct RuleContext<'t> {
    tree: TreeAccess<'t>,
    node: NodeId,
    user_data: &'t BTreeMap<String, String>,
    violations: Vec<Violation>,
}

impl<'t> RuleContext<'t> {
    pub(crate) fn read_only(
        tree: &'t SyntaxTree,
        node: NodeId,
        user_data: &'t BTreeMap<String, String>,
    ) -> Self {
        Self {
            tree: TreeAccess::Shared(tree),
            node,
            user_data,
            violations: Vec::new(),
        }
    }

    pub(crate) fn autocorrecting(
        tree: &'t mut SyntaxTree,
        node: NodeId,
        user_data: &'t BTreeMap<String, String>,
    ) -> Self {
        Self {
            tree: TreeAccess::Exclusive(tree),
            node,
            user_data,
            violations: Vec::new(),
        }
    }

    /// The node being visited.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn tree(&self) -> &SyntaxTree {
        match &self.tree {
            TreeAccess::Shared(tree) => *tree,
            TreeAccess::Exclusive(tree) => &**tree,
        }
    }

    /// Mutable access to the tree. Only available in format mode.
    pub fn tree_mut(&mut self) -> Option<&mut SyntaxTree> {
        match &mut self.tree {
            TreeAccess::Shared(_) => None,
            TreeAccess::Exclusive(tree) => Some(&mut **tree),
        }
    }

    /// True when the rule should fix what it reports as auto-correctable.
    pub fn autocorrect(&self) -> bool {
        matches!(self.tree, TreeAccess::Exclusive(_))
    }

    pub fn user_data(&self, key: &str) -> Option<&str> {
        self.user_data.get(key).map(String::as_str)
    }

    /// Reports a violation at `offset` in the normalized text.
    pub fn report(
        &mut self,
        offset: usize,
        message: impl Into<String>,
        can_be_auto_corrected: bool,
    ) {
        self.violations.push(Violation {
            offset,
            message: message.into(),
            can_be_auto_corrected,
        });
    }

    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// A named, ordered group of rules.
#[derive(Clone)]
pub struct RuleSet {
    id: String,
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSet {
    pub fn new(id: impl Into<String>, rules: Vec<Arc<dyn Rule>>) -> Self {
        Self {
            id: id.into(),
            rules,
        }
    }

    /// Creates a rule set with the [`STANDARD_RULE_SET_ID`].
    pub fn standard(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self::new(STANDARD_RULE_SET_ID, rules)
    }

    /// Appends a rule.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn is_standard(&self) -> bool {
        self.id == STANDARD_RULE_SET_ID
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&str> = self.rules.iter().map(|r| r.id()).collect();
        f.debug_struct("RuleSet")
            .field("id", &self.id)
            .field("rules", &rules)
            .finish()
    }
}
