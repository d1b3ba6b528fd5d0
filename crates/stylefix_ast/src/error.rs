//! Tree mutation errors.

use thiserror::Error;

use crate::NodeId;

/// Errors raised by structural edits on a [`SyntaxTree`](crate::SyntaxTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The id does not belong to this tree.
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Children were added to a leaf node.
    #[error("Node {0:?} is a leaf and cannot have children")]
    NotAnElement(NodeId),

    /// Text was set on a node that is not a leaf.
    #[error("Node {0:?} is not a leaf")]
    NotALeaf(NodeId),

    /// The node to insert already has a parent.
    #[error("Node {0:?} is already attached to a parent")]
    AlreadyAttached(NodeId),

    /// The anchor of a sibling insertion has no parent.
    #[error("Node {0:?} has no parent")]
    Detached(NodeId),

    /// The root node cannot be moved or removed.
    #[error("The root node cannot be detached or replaced")]
    RootImmutable,

    /// Inserting the node would make it its own ancestor.
    #[error("Inserting {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The node that would become the parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },

    /// The child index is past the end of the children list.
    #[error("Index {index} is out of bounds for {len} children")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of children of the parent.
        len: usize,
    },
}
