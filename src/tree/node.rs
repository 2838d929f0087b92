//! Arena-backed call tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. A parent
//! link is a plain index and never owns anything, so dropping the tree is a
//! flat `Vec` drop regardless of depth.
//!
//! Every arena index of a child is greater than its parent's. Bottom-up
//! passes rely on this and simply walk the arena backwards.

use crate::parser::Frame;
use serde::Serialize;
use std::collections::BTreeMap;

/// Index of a node in a [`FlameTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the call tree
///
/// `total_weight == self_weight + Σ children.total_weight` holds for every
/// reachable node of a finished tree.
#[derive(Debug, Clone, Default)]
pub struct FlameNode<'a> {
    pub(crate) frame: Option<Frame<'a>>,
    pub(crate) self_weight: u64,
    pub(crate) total_weight: u64,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: BTreeMap<Frame<'a>, NodeId>,
    pub(crate) height: usize,
}

impl<'a> FlameNode<'a> {
    pub(crate) fn new(frame: Option<Frame<'a>>, parent: Option<NodeId>) -> Self {
        Self {
            frame,
            parent,
            ..Default::default()
        }
    }

    /// Frame of this node, `None` for the root
    pub fn frame(&self) -> Option<&Frame<'a>> {
        self.frame.as_ref()
    }

    /// Weight of samples ending exactly here
    pub fn self_weight(&self) -> u64 {
        self.self_weight
    }

    /// Weight of this node and everything below it
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in frame order
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Length of the longest chain of descendants, 0 for a leaf
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Aggregated call tree built from a collapsed histogram
///
/// **Public** - consumed by layout and renderers
#[derive(Debug, Clone)]
pub struct FlameTree<'a> {
    pub(crate) nodes: Vec<FlameNode<'a>>,
}

impl Default for FlameTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FlameTree<'a> {
    /// Tree holding only an empty root
    pub fn new() -> Self {
        Self {
            nodes: vec![FlameNode::new(None, None)],
        }
    }

    pub fn root(&self) -> &FlameNode<'a> {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Node by id
    ///
    /// Ids handed out by this tree are always valid.
    pub fn node(&self, id: NodeId) -> &FlameNode<'a> {
        &self.nodes[id.0]
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_weight() == 0
    }

    pub fn total_weight(&self) -> u64 {
        self.root().total_weight
    }

    /// Height of the root
    pub fn height(&self) -> usize {
        self.root().height
    }

    /// Child of `parent` with exactly this frame
    pub fn child(&self, parent: NodeId, frame: &Frame<'a>) -> Option<NodeId> {
        self.nodes[parent.0].children.get(frame).copied()
    }

    /// Follow a path of frame names from the root
    ///
    /// Names match regardless of the function/module flag; the first match in
    /// frame order wins.
    pub fn find_path(&self, names: &[&str]) -> Option<NodeId> {
        names.iter().try_fold(NodeId::ROOT, |current, name| {
            self.nodes[current.0]
                .children
                .iter()
                .find(|(frame, _)| frame.name() == *name)
                .map(|(_, id)| *id)
        })
    }

    /// Frames from the root down to `id`
    pub fn path_of(&self, id: NodeId) -> Vec<Frame<'a>> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current.0];
            if let Some(frame) = node.frame {
                path.push(frame);
            }
            cursor = node.parent;
        }
        path.reverse();
        path
    }

    /// All nodes with their ids, parents before children
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &FlameNode<'a>)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_is_empty_root() {
        let tree = FlameTree::new();

        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert!(tree.root().is_root());
        assert!(tree.root().is_leaf());
        assert!(tree.root().frame().is_none());
        assert_eq!(tree.find_path(&[]), Some(NodeId::ROOT));
        assert_eq!(tree.find_path(&["main"]), None);
    }
}
