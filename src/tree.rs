//! Ordered labeled trees
//!
//! Nodes live in a vector arena and refer to their parent and children by
//! index. Labels are interned per tree. A target tree may also own a single
//! sentinel node standing for "no image" when another tree is mapped onto it.

use lasso::{Rodeo, Spur};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Unique identifier for a node (index into `Tree::nodes`)
pub type NodeId = usize;

/// Label carried (and printed) by the sentinel node
pub const SENTINEL_LABEL: &str = "lambda";

/// Depth and preorder value of nodes that are never numbered (the sentinel)
const UNNUMBERED: usize = usize::MAX;

/// Error raised by tree construction calls
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Tree error: unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Tree error: the sentinel node cannot be linked into the tree")]
    SentinelLink,
}

/// A node in an ordered tree
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub label: Spur,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Distance from the root (root = 0)
    pub depth: usize,
    /// Position in a root-first, left-to-right traversal
    pub preorder: usize,
}

impl Node {
    fn new(id: NodeId, label: Spur) -> Self {
        Self {
            id,
            label,
            parent: None,
            children: Vec::new(),
            depth: 0,
            preorder: 0,
        }
    }
}

/// An ordered labeled tree
#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub root_id: Option<NodeId>,
    sentinel: Option<NodeId>,
    labels: Rodeo,
}

impl Tree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root_id: None,
            sentinel: None,
            labels: Rodeo::new(),
        }
    }

    /// Create a detached node and return its id
    pub fn create_node(&mut self, label: &str) -> NodeId {
        let id = self.nodes.len();
        let label = self.labels.get_or_intern(label);
        self.nodes.push(Node::new(id, label));
        id
    }

    /// Designate the root node
    pub fn set_root(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.check_linkable(id)?;
        self.root_id = Some(id);
        Ok(())
    }

    /// Append `child` to the ordered child list of `parent`
    ///
    /// Must be called before [`Tree::assign_preorder_and_depth`]; links added
    /// afterwards leave the numbering stale.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_linkable(parent)?;
        self.check_linkable(child)?;
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    fn check_linkable(&self, id: NodeId) -> Result<(), TreeError> {
        if id >= self.nodes.len() {
            return Err(TreeError::UnknownNode(id));
        }
        if self.sentinel == Some(id) {
            return Err(TreeError::SentinelLink);
        }
        Ok(())
    }

    /// Number every node reachable from the root with its depth and preorder
    /// index, returning how many nodes were reached.
    ///
    /// Walks with an explicit stack so deep chains do not grow the call stack.
    pub fn assign_preorder_and_depth(&mut self) -> usize {
        let Some(root) = self.root_id else {
            return 0;
        };

        let mut counter = 0;
        let mut stack = vec![(root, 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = &mut self.nodes[id];
            node.depth = depth;
            node.preorder = counter;
            counter += 1;
            // Reverse so the leftmost child is popped first
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        counter
    }

    /// Node ids in preorder (sentinel excluded)
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.root_id.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Add the sentinel node if the tree does not have one yet
    pub fn ensure_sentinel(&mut self) -> NodeId {
        if let Some(id) = self.sentinel {
            return id;
        }
        let id = self.create_node(SENTINEL_LABEL);
        let node = &mut self.nodes[id];
        node.depth = UNNUMBERED;
        node.preorder = UNNUMBERED;
        self.sentinel = Some(id);
        id
    }

    pub fn sentinel(&self) -> Option<NodeId> {
        self.sentinel
    }

    #[inline]
    pub fn is_sentinel(&self, id: NodeId) -> bool {
        self.sentinel == Some(id)
    }

    /// Number of real nodes (sentinel excluded)
    pub fn len(&self) -> usize {
        self.nodes.len() - usize::from(self.sentinel.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the label of a node
    #[inline]
    pub fn label(&self, id: NodeId) -> &str {
        self.labels.resolve(&self.nodes[id].label)
    }

    /// Label as printed in reports
    ///
    /// The sentinel prints as `lambda`; a real node carrying that same label
    /// is quoted so the two stay distinguishable.
    pub fn display_label(&self, id: NodeId) -> Cow<'_, str> {
        let label = self.label(id);
        if label == SENTINEL_LABEL && !self.is_sentinel(id) {
            Cow::Owned(format!("\"{}\"", label))
        } else {
            Cow::Borrowed(label)
        }
    }

    /// Intern a label without creating a node
    pub fn intern(&mut self, label: &str) -> Spur {
        self.labels.get_or_intern(label)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    #[inline]
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id].depth
    }

    #[inline]
    pub fn preorder_index(&self, id: NodeId) -> usize {
        self.nodes[id].preorder
    }

    /// True if `ancestor` lies strictly above `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        write_label(f, self.label(id))?;
        let children = self.children(id);
        if children.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.fmt_subtree(f, child)?;
        }
        f.write_str(")")
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Characters allowed in an unquoted label of the bracket notation
pub(crate) fn is_bare_label_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\'' | ':')
}

fn write_label(f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
    if !label.is_empty() && label.chars().all(is_bare_label_char) {
        f.write_str(label)
    } else {
        write!(f, "\"{}\"", label)
    }
}

/// Renders the bracket notation, e.g. `a(b, c(d))`
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root_id {
            Some(root) => self.fmt_subtree(f, root),
            None => Ok(()),
        }
    }
}
