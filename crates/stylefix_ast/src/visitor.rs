//! Pre-order traversal over a [`SyntaxTree`].
//!
//! - [`Visitor`] - Read-only traversal trait
//! - [`walk_node`] - Drive a [`Visitor`] over a subtree
//! - [`walk`] - Closure-based read-only traversal
//! - [`walk_mut`] - Closure-based traversal that may edit the tree
//!
//! All traversals are depth-first pre-order and stop as soon as the callback
//! returns [`ControlFlow::Break`].
//!
//! # Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use stylefix_ast::{NodeId, NodeKind, SyntaxTree};
//! use stylefix_ast::visitor::{VisitResult, Visitor, walk_node};
//!
//! struct CommentCounter(usize);
//!
//! impl Visitor for CommentCounter {
//!     fn visit(&mut self, tree: &SyntaxTree, node: NodeId) -> VisitResult {
//!         if tree.is_comment(node) {
//!             self.0 += 1;
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let mut tree = SyntaxTree::new("file");
//! let root = tree.root();
//! let comment = tree.new_leaf(NodeKind::LineComment, "EOL_COMMENT", "// hi");
//! tree.append_child(root, comment).unwrap();
//!
//! let mut counter = CommentCounter(0);
//! let _ = walk_node(&mut counter, &tree, root);
//! assert_eq!(counter.0, 1);
//! ```

use std::ops::ControlFlow;

use crate::{NodeId, SyntaxTree};

/// Result type for visitor methods.
///
/// - `ControlFlow::Continue(())` - Continue traversal
/// - `ControlFlow::Break(())` - Stop traversal
pub type VisitResult = ControlFlow<()>;

/// Read-only visitor invoked once per node in pre-order.
pub trait Visitor {
    fn visit(&mut self, tree: &SyntaxTree, node: NodeId) -> VisitResult;
}

/// Walks `node` and its descendants with a [`Visitor`].
pub fn walk_node<V: Visitor>(visitor: &mut V, tree: &SyntaxTree, node: NodeId) -> VisitResult {
    walk(tree, node, |tree, id| visitor.visit(tree, id))
}

/// Calls `f` on `node` and every descendant, in pre-order.
pub fn walk<B>(
    tree: &SyntaxTree,
    node: NodeId,
    mut f: impl FnMut(&SyntaxTree, NodeId) -> ControlFlow<B>,
) -> ControlFlow<B> {
    for id in tree.descendants(node) {
        f(tree, id)?;
    }
    ControlFlow::Continue(())
}

/// Calls `f` on `node` and every descendant, in pre-order, letting `f` edit
/// the tree as it goes.
///
/// Each node's children are read after `f` returned for that node, so edits
/// a callback makes below the current node are seen by the walk. Nodes that
/// were removed from the walked subtree before their turn are skipped, and
/// siblings inserted next to an already scheduled node are not visited.
pub fn walk_mut<B>(
    tree: &mut SyntaxTree,
    node: NodeId,
    mut f: impl FnMut(&mut SyntaxTree, NodeId) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        if !tree.is_ancestor_or_self(node, id) {
            continue;
        }
        f(tree, id)?;
        stack.extend(tree.children(id).iter().rev().copied());
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeKind;
    use pretty_assertions::assert_eq;

    fn tree_with_tokens(tokens: &[&str]) -> (SyntaxTree, Vec<NodeId>) {
        let mut tree = SyntaxTree::new("file");
        let root = tree.root();
        let ids = tokens
            .iter()
            .map(|text| {
                let id = tree.new_leaf(NodeKind::Token, "IDENT", *text);
                tree.append_child(root, id).unwrap();
                id
            })
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_walk_visits_in_pre_order() {
        let mut tree = SyntaxTree::new("file");
        let root = tree.root();
        let group = tree.new_element(NodeKind::Element, "GROUP");
        let a = tree.new_leaf(NodeKind::Token, "IDENT", "a");
        let b = tree.new_leaf(NodeKind::Token, "IDENT", "b");
        tree.append_child(root, group).unwrap();
        tree.append_child(group, a).unwrap();
        tree.append_child(root, b).unwrap();

        let mut seen = Vec::new();
        let _ = walk(&tree, root, |_, id| {
            seen.push(id);
            ControlFlow::<()>::Continue(())
        });

        assert_eq!(seen, vec![root, group, a, b]);
    }

    #[test]
    fn test_walk_stops_on_break() {
        let (tree, ids) = tree_with_tokens(&["a", "b", "c"]);
        let mut seen = Vec::new();
        let result = walk(&tree, tree.root(), |tree, id| {
            seen.push(id);
            if tree.node(id).text() == Some("b") {
                ControlFlow::Break(id)
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(result, ControlFlow::Break(ids[1]));
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_walk_mut_skips_removed_nodes() {
        let (mut tree, ids) = tree_with_tokens(&["a", "b", "c"]);
        let root = tree.root();
        let mut seen = Vec::new();
        let _ = walk_mut(&mut tree, root, |tree, id| {
            seen.push(id);
            if id == ids[0] {
                tree.detach(ids[1]).unwrap();
            }
            ControlFlow::<()>::Continue(())
        });

        assert_eq!(seen, vec![root, ids[0], ids[2]]);
        assert_eq!(tree.text(), "ac");
    }

    #[test]
    fn test_walk_mut_does_not_visit_inserted_siblings() {
        let (mut tree, ids) = tree_with_tokens(&["a", "b"]);
        let root = tree.root();
        let mut inserted = None;
        let mut seen = Vec::new();
        let _ = walk_mut(&mut tree, root, |tree, id| {
            seen.push(id);
            if id == ids[0] {
                let new = tree.new_leaf(NodeKind::Whitespace, "WHITE_SPACE", " ");
                tree.insert_after(ids[0], new).unwrap();
                inserted = Some(new);
            }
            ControlFlow::<()>::Continue(())
        });

        assert_eq!(seen, vec![root, ids[0], ids[1]]);
        assert_eq!(tree.text(), "a b");
        assert!(inserted.is_some());
    }

    #[test]
    fn test_walk_mut_sees_new_children_of_current_node() {
        let mut tree = SyntaxTree::new("file");
        let root = tree.root();
        let group = tree.new_element(NodeKind::Element, "GROUP");
        tree.append_child(root, group).unwrap();

        let mut seen = Vec::new();
        let _ = walk_mut(&mut tree, root, |tree, id| {
            seen.push(tree.label(id).to_string());
            if id == group {
                let child = tree.new_leaf(NodeKind::Token, "IDENT", "x");
                tree.append_child(group, child).unwrap();
            }
            ControlFlow::<()>::Continue(())
        });

        assert_eq!(seen, vec!["file", "GROUP", "IDENT"]);
    }
}
