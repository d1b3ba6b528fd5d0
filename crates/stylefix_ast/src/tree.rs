//! SyntaxTree definition.
//!
//! The core tree type used throughout stylefix. Nodes are stored in an
//! index arena and addressed by [`NodeId`]; rules running in fix mode edit
//! the tree in place through the mutation methods on [`SyntaxTree`].

use std::cell::RefCell;

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::{NodeKind, Span, TreeError};

/// Identifier of a node inside a [`SyntaxTree`].
///
/// Ids are never reused: a node removed from the tree keeps its id and can
/// be re-attached elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the syntax tree.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    label: String,
    /// Source text of a leaf. Always empty for elements.
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    /// Byte length of the subtree text, kept current by every edit.
    len: usize,
}

impl Node {
    /// The structural kind of this node.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Grammar specific label assigned by the parser (e.g. `IDENT`).
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The text of a leaf, `None` for elements.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.kind.is_leaf().then_some(self.text.as_str())
    }

    /// Ordered children of an element; empty for leaves.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The parent of this node, `None` for the root and detached nodes.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }
}

/// Cached child offsets, indexed by arena index.
///
/// For an element `p`, the children `0..valid[p]` have `slot` set to their
/// index and `rel_start` set to their offset from the start of `p`. Edits
/// lower `valid` to the first child that may have moved; lookups raise it
/// again, so a left to right walk only lays out each child once.
#[derive(Debug, Clone, Default)]
struct Layout {
    slot: Vec<usize>,
    rel_start: Vec<usize>,
    valid: Vec<usize>,
}

impl Layout {
    fn push(&mut self) {
        self.slot.push(0);
        self.rel_start.push(0);
        self.valid.push(0);
    }

    /// Returns the index of `id` in `children` if its cached slot still holds.
    fn cached_slot(&self, parent: NodeId, children: &[NodeId], id: NodeId) -> Option<usize> {
        let slot = self.slot[id.index()];
        (slot < self.valid[parent.index()] && children.get(slot) == Some(&id)).then_some(slot)
    }

    fn invalidate_from(&mut self, parent: NodeId, index: usize) {
        let valid = &mut self.valid[parent.index()];
        *valid = (*valid).min(index);
    }
}

/// An owned, mutable syntax tree.
///
/// Text lengths are maintained eagerly along the ancestor chain of each
/// edit. Start offsets are computed on demand and cached per element; an
/// edit only invalidates the siblings that follow the edited node.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
    layout: RefCell<Layout>,
}

impl SyntaxTree {
    /// Creates a tree containing only an empty [`NodeKind::File`] root.
    pub fn new(label: impl Into<String>) -> Self {
        let root = Node {
            kind: NodeKind::File,
            label: label.into(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            len: 0,
        };
        let mut layout = Layout::default();
        layout.push();
        Self {
            nodes: vec![root],
            root: NodeId(0),
            layout: RefCell::new(layout),
        }
    }

    /// Returns the root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node for `id`, or `None` if the id belongs to another tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    #[inline]
    pub fn label(&self, id: NodeId) -> &str {
        &self.node(id).label
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn is_comment(&self, id: NodeId) -> bool {
        self.node(id).is_comment()
    }

    #[inline]
    pub fn is_whitespace(&self, id: NodeId) -> bool {
        self.node(id).is_whitespace()
    }

    /// Allocates a detached leaf. Attach it with one of the insertion methods.
    pub fn new_leaf(
        &mut self,
        kind: NodeKind,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> NodeId {
        debug_assert!(kind.is_leaf(), "{kind} is not a leaf kind");
        let text = text.into();
        self.alloc(Node {
            kind,
            label: label.into(),
            len: text.len(),
            text,
            children: Vec::new(),
            parent: None,
        })
    }

    /// Allocates a detached, childless element.
    pub fn new_element(&mut self, kind: NodeKind, label: impl Into<String>) -> NodeId {
        debug_assert!(!kind.is_leaf(), "{kind} is a leaf kind");
        self.alloc(Node {
            kind,
            label: label.into(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            len: 0,
        })
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.layout.get_mut().push();
        id
    }

    // === Offsets ===

    /// Start offset of the node.
    ///
    /// For attached nodes this is the byte offset in [`SyntaxTree::text`];
    /// for detached nodes it is relative to the detached subtree.
    pub fn start_offset(&self, id: NodeId) -> usize {
        let mut layout = self.layout.borrow_mut();
        let mut start = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            self.resolve_slot(&mut layout, parent, current);
            start += layout.rel_start[current.index()];
            current = parent;
        }
        start
    }

    /// Byte length of the node's text.
    #[inline]
    pub fn text_len(&self, id: NodeId) -> usize {
        self.node(id).len
    }

    /// Byte span of the node.
    pub fn span(&self, id: NodeId) -> Span {
        let start = self.start_offset(id);
        Span::new(start, start + self.text_len(id))
    }

    /// Index of `id` among the children of `parent`.
    fn index_in_parent(&self, parent: NodeId, id: NodeId) -> usize {
        self.resolve_slot(&mut self.layout.borrow_mut(), parent, id)
    }

    /// Lays out the children of `parent` up to `id` and returns its index.
    fn resolve_slot(&self, layout: &mut Layout, parent: NodeId, id: NodeId) -> usize {
        let children = self.children(parent);
        if let Some(slot) = layout.cached_slot(parent, children, id) {
            return slot;
        }

        let mut index = layout.valid[parent.index()];
        let mut offset = match index.checked_sub(1) {
            Some(prev) => {
                let prev = children[prev];
                layout.rel_start[prev.index()] + self.text_len(prev)
            }
            None => 0,
        };
        while let Some(&child) = children.get(index) {
            layout.slot[child.index()] = index;
            layout.rel_start[child.index()] = offset;
            offset += self.text_len(child);
            index += 1;
            if child == id {
                break;
            }
        }
        debug_assert_eq!(children.get(index.wrapping_sub(1)), Some(&id));
        layout.valid[parent.index()] = index;
        index - 1
    }

    /// Replaces `old_len` with `new_len` in the length of `from` and each of
    /// its ancestors, dropping the cached offsets of the siblings that follow.
    fn resize(&mut self, from: NodeId, old_len: usize, new_len: usize) {
        let layout = self.layout.get_mut();
        let mut current = Some(from);
        while let Some(id) = current {
            let node = &mut self.nodes[id.index()];
            node.len = node.len - old_len + new_len;
            current = node.parent;
            if let Some(parent) = current
                && let Some(slot) =
                    layout.cached_slot(parent, &self.nodes[parent.index()].children, id)
            {
                layout.invalidate_from(parent, slot + 1);
            }
        }
    }

    // === Text ===

    /// Renders the whole tree back to text.
    pub fn text(&self) -> String {
        self.text_of(self.root)
    }

    /// Renders the subtree rooted at `id` to text.
    pub fn text_of(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(self.text_len(id));
        for descendant in self.descendants(id) {
            let node = self.node(descendant);
            if node.kind.is_leaf() {
                out.push_str(&node.text);
            }
        }
        out
    }

    // === Navigation ===

    /// Pre-order iterator over `id` and all of its descendants.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Returns true if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current == self.root
    }

    /// Returns true if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, index) = self.position_in_parent(id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, index) = self.position_in_parent(id)?;
        siblings.get(index + 1).copied()
    }

    fn position_in_parent(&self, id: NodeId) -> Option<(&[NodeId], usize)> {
        let parent = self.parent(id)?;
        Some((self.children(parent), self.index_in_parent(parent, id)))
    }

    // === Mutation ===

    /// Replaces the text of a leaf.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        self.check(id)?;
        let node = &mut self.nodes[id.index()];
        if !node.kind.is_leaf() {
            return Err(TreeError::NotALeaf(id));
        }
        let old_len = node.len;
        node.text = text.into();
        let new_len = node.text.len();
        self.resize(id, old_len, new_len);
        Ok(())
    }

    /// Appends a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Inserts a detached node as the `index`-th child of `parent`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.check_insertable(parent, child)?;
        let len = self.children(parent).len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.nodes[parent.index()].children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
        self.layout.get_mut().invalidate_from(parent, index);
        let child_len = self.text_len(child);
        self.resize(parent, 0, child_len);
        Ok(())
    }

    /// Inserts a detached node right before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, new: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.locate(anchor)?;
        self.insert_child(parent, index, new)
    }

    /// Inserts a detached node right after `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, new: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.locate(anchor)?;
        self.insert_child(parent, index + 1, new)
    }

    /// Removes a node (with its subtree) from its parent.
    ///
    /// The node keeps its id and may be attached again. Detaching a node that
    /// has no parent is a no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.check(id)?;
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let Some(parent) = self.parent(id) else {
            return Ok(());
        };
        let index = self.index_in_parent(parent, id);
        self.nodes[parent.index()].children.remove(index);
        self.nodes[id.index()].parent = None;
        self.layout.get_mut().invalidate_from(parent, index);
        let len = self.text_len(id);
        self.resize(parent, len, 0);
        Ok(())
    }

    /// Puts the detached node `new` in the place of `old`, detaching `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.locate(old)?;
        self.check_insertable(parent, new)?;
        self.nodes[parent.index()].children[index] = new;
        self.nodes[new.index()].parent = Some(parent);
        self.nodes[old.index()].parent = None;
        self.layout.get_mut().invalidate_from(parent, index);
        let (old_len, new_len) = (self.text_len(old), self.text_len(new));
        self.resize(parent, old_len, new_len);
        Ok(())
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        self.get(id).map(|_| ()).ok_or(TreeError::UnknownNode(id))
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if self.kind(parent).is_leaf() {
            return Err(TreeError::NotAnElement(parent));
        }
        if child == self.root {
            return Err(TreeError::RootImmutable);
        }
        if self.parent(child).is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::WouldCycle { parent, child });
        }
        Ok(())
    }

    /// Returns the parent of `id` and the index of `id` among its children.
    fn locate(&self, id: NodeId) -> Result<(NodeId, usize), TreeError> {
        self.check(id)?;
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let parent = self.parent(id).ok_or(TreeError::Detached(id))?;
        Ok((parent, self.index_in_parent(parent, id)))
    }

    // === Serialization ===

    /// Returns a serializable view of the subtree rooted at `id`.
    pub fn view(&self, id: NodeId) -> NodeView<'_> {
        NodeView { tree: self, id }
    }
}

/// Pre-order iterator over a subtree. See [`SyntaxTree::descendants`].
pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Serializable view of a subtree, used for debug dumps.
#[derive(Clone, Copy)]
pub struct NodeView<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl Serialize for NodeView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let node = self.tree.node(self.id);
        let span = self.tree.span(self.id);

        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("kind", &node.kind)?;
        state.serialize_field("label", &node.label)?;
        state.serialize_field("range", &[span.start, span.end])?;
        if node.kind.is_leaf() {
            state.serialize_field("text", &node.text)?;
        } else {
            state.serialize_field(
                "children",
                &ChildrenView {
                    tree: self.tree,
                    children: &node.children,
                },
            )?;
        }
        state.end()
    }
}

struct ChildrenView<'t> {
    tree: &'t SyntaxTree,
    children: &'t [NodeId],
}

impl Serialize for ChildrenView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.children.iter().map(|&id| self.tree.view(id)))
    }
}
