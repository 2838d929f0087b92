//! Build a [`FlameTree`] from collapsed stacks.
//!
//! Totals and heights are maintained eagerly on every insertion. Pruning
//! runs once, after all paths are in, and is followed by a compaction pass
//! that drops unreachable nodes and recomputes heights.

use super::node::{FlameNode, FlameTree, NodeId};
use crate::aggregator::CollapsedStacks;
use crate::parser::Frame;
use crate::utils::error::TreeError;
use log::debug;

/// Options for tree construction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BuildOptions {
    /// Paths longer than this are truncated (0 = unlimited)
    pub max_depth: usize,

    /// Children below this share of their parent's total are pruned
    pub prune_threshold: Option<f64>,
}

/// Builds call trees
///
/// **Public** - main entry point for tree construction
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build a tree from every path in `stacks`
    ///
    /// # Errors
    /// * `TreeError::Empty` - the histogram carried no weight
    pub fn build<'a>(&self, stacks: &CollapsedStacks<'a>) -> Result<FlameTree<'a>, TreeError> {
        let mut tree = FlameTree::new();

        for (path, weight) in stacks.iter() {
            let path = match self.options.max_depth {
                0 => path,
                max => &path[..path.len().min(max)],
            };
            tree.insert(path, weight);
        }

        if tree.is_empty() {
            return Err(TreeError::Empty);
        }

        debug!(
            "Built tree with {} nodes, height {}",
            tree.len(),
            tree.height()
        );

        if let Some(threshold) = self.options.prune_threshold.filter(|t| *t > 0.0) {
            tree.prune(threshold);
        }

        Ok(tree)
    }
}

impl<'a> FlameTree<'a> {
    /// Add `weight` to the node at `path`, creating missing nodes
    ///
    /// **Private** - used by `TreeBuilder::build`
    pub(crate) fn insert(&mut self, path: &[Frame<'a>], weight: u64) {
        let mut current = NodeId::ROOT;
        for frame in path {
            current = match self.child(current, frame) {
                Some(child) => child,
                None => self.push_child(current, *frame),
            };
        }

        self.nodes[current.0].self_weight += weight;

        let mut cursor = Some(current);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id.0];
            node.total_weight += weight;
            cursor = node.parent;
        }
    }

    fn push_child(&mut self, parent: NodeId, frame: Frame<'a>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(FlameNode::new(Some(frame), Some(parent)));
        self.nodes[parent.0].children.insert(frame, id);

        // Raise ancestors until one is already tall enough
        let mut height = 1;
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            let node = &mut self.nodes[ancestor.0];
            if node.height >= height {
                break;
            }
            node.height = height;
            height += 1;
            cursor = node.parent;
        }

        id
    }

    /// Remove children whose share of their parent's total is below `threshold`
    ///
    /// The root is never removed. The weight of a removed subtree is credited
    /// to its parent's self weight, so every total stays unchanged.
    pub fn prune(&mut self, threshold: f64) {
        let before = self.nodes.len();
        let mut stack = vec![NodeId::ROOT];

        while let Some(id) = stack.pop() {
            let total = self.nodes[id.0].total_weight;
            if total == 0 {
                continue;
            }

            let doomed: Vec<Frame<'a>> = self.nodes[id.0]
                .children
                .iter()
                .filter(|(_, child)| {
                    (self.nodes[child.0].total_weight as f64 / total as f64) < threshold
                })
                .map(|(frame, _)| *frame)
                .collect();

            let mut reclaimed = 0;
            for frame in &doomed {
                if let Some(child) = self.nodes[id.0].children.remove(frame) {
                    reclaimed += self.nodes[child.0].total_weight;
                }
            }
            self.nodes[id.0].self_weight += reclaimed;

            stack.extend(self.nodes[id.0].children());
        }

        self.compact();
        debug!("Pruned tree from {} to {} nodes", before, self.nodes.len());
    }

    /// Drop unreachable nodes, renumber in pre-order and recompute heights
    fn compact(&mut self) {
        let mut remap: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];

        while let Some(id) = stack.pop() {
            remap[id.0] = Some(order.len());
            order.push(id);
            stack.extend(self.nodes[id.0].children().rev());
        }

        let mut old = std::mem::take(&mut self.nodes);
        self.nodes = order
            .into_iter()
            .map(|id| {
                let mut node = std::mem::take(&mut old[id.0]);
                node.parent = node.parent.and_then(|p| remap[p.0]).map(NodeId);
                node.children = std::mem::take(&mut node.children)
                    .into_iter()
                    .filter_map(|(frame, child)| remap[child.0].map(|c| (frame, NodeId(c))))
                    .collect();
                node
            })
            .collect();

        self.recompute_heights();
    }

    fn recompute_heights(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let height = self.nodes[index]
                .children
                .values()
                .map(|child| self.nodes[child.0].height + 1)
                .max()
                .unwrap_or(0);
            self.nodes[index].height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stacks(paths: &[(&'static str, u64)]) -> CollapsedStacks<'static> {
        let mut stacks = CollapsedStacks::new();
        for &(path, weight) in paths {
            let frames: Vec<_> = path.split(';').map(Frame::function).collect();
            stacks.add(&frames, weight);
        }
        stacks
    }

    fn total(tree: &FlameTree<'_>, path: &[&str]) -> u64 {
        tree.node(tree.find_path(path).unwrap()).total_weight()
    }

    fn assert_weight_invariant(tree: &FlameTree<'_>) {
        for (id, node) in tree.iter() {
            let children: u64 = node
                .children()
                .map(|c| tree.node(c).total_weight())
                .sum();
            assert_eq!(
                node.total_weight(),
                node.self_weight() + children,
                "weight invariant broken at {:?}",
                id
            );
        }
    }

    #[test]
    fn test_build_two_sample_scenario() {
        let tree = TreeBuilder::default()
            .build(&stacks(&[("main;foo;bar", 1), ("main;foo;baz", 1)]))
            .unwrap();

        assert_eq!(tree.total_weight(), 2);
        assert_eq!(total(&tree, &["main"]), 2);
        assert_eq!(total(&tree, &["main", "foo"]), 2);
        assert_eq!(total(&tree, &["main", "foo", "bar"]), 1);
        assert_eq!(total(&tree, &["main", "foo", "baz"]), 1);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.len(), 5);
        assert_weight_invariant(&tree);
    }

    #[test]
    fn test_self_weight_on_inner_nodes() {
        let tree = TreeBuilder::default()
            .build(&stacks(&[("main", 2), ("main;foo", 3)]))
            .unwrap();

        let main = tree.node(tree.find_path(&["main"]).unwrap());
        assert_eq!(main.self_weight(), 2);
        assert_eq!(main.total_weight(), 5);
        assert_weight_invariant(&tree);
    }

    #[test]
    fn test_max_depth_truncates_and_keeps_weight() {
        let options = BuildOptions {
            max_depth: 2,
            ..Default::default()
        };
        let tree = TreeBuilder::new(options)
            .build(&stacks(&[("a;b;c;d", 3), ("a;b;e", 2), ("a", 1)]))
            .unwrap();

        let b = tree.node(tree.find_path(&["a", "b"]).unwrap());
        assert_eq!(b.self_weight(), 5);
        assert!(b.is_leaf());
        assert_eq!(tree.total_weight(), 6);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_prune_at_half_keeps_both_leaves() {
        let options = BuildOptions {
            prune_threshold: Some(0.5),
            ..Default::default()
        };
        let tree = TreeBuilder::new(options)
            .build(&stacks(&[("main;foo;bar", 3), ("main;foo;baz", 3)]))
            .unwrap();

        assert!(tree.find_path(&["main", "foo", "bar"]).is_some());
        assert!(tree.find_path(&["main", "foo", "baz"]).is_some());
        assert_eq!(tree.total_weight(), 6);
    }

    #[test]
    fn test_prune_above_half_removes_both_leaves() {
        let options = BuildOptions {
            prune_threshold: Some(0.6),
            ..Default::default()
        };
        let tree = TreeBuilder::new(options)
            .build(&stacks(&[("main;foo;bar", 3), ("main;foo;baz", 3)]))
            .unwrap();

        let foo = tree.node(tree.find_path(&["main", "foo"]).unwrap());
        assert!(foo.is_leaf());
        assert_eq!(foo.total_weight(), 6);
        assert_eq!(foo.self_weight(), 6);
        assert_eq!(tree.total_weight(), 6);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.height(), 2);
        assert_weight_invariant(&tree);
    }

    #[test]
    fn test_prune_ratios_use_current_parent() {
        let options = BuildOptions {
            prune_threshold: Some(0.2),
            ..Default::default()
        };
        let tree = TreeBuilder::new(options)
            .build(&stacks(&[("big", 90), ("small;x", 9), ("small;y", 1)]))
            .unwrap();

        // "small" is 10% of root and goes; nothing below it survives either
        assert!(tree.find_path(&["small"]).is_none());
        assert_eq!(tree.root().self_weight(), 10);
        assert_eq!(tree.total_weight(), 100);

        for (id, node) in tree.iter() {
            if let Some(parent) = node.parent() {
                let ratio = node.total_weight() as f64 / tree.node(parent).total_weight() as f64;
                assert!(ratio >= 0.2, "{:?} kept at ratio {}", id, ratio);
            }
        }
        assert_weight_invariant(&tree);
    }

    #[test]
    fn test_compaction_keeps_parent_links_consistent() {
        let options = BuildOptions {
            prune_threshold: Some(0.3),
            ..Default::default()
        };
        let tree = TreeBuilder::new(options)
            .build(&stacks(&[
                ("a;b", 1),
                ("c;d;e", 5),
                ("c;d;f", 4),
                ("c;g", 1),
            ]))
            .unwrap();

        for (id, node) in tree.iter() {
            for child in node.children() {
                assert_eq!(tree.node(child).parent(), Some(id));
                assert!(child.index() > id.index());
            }
        }
        assert_eq!(tree.height(), 3);
        assert_eq!(
            tree.path_of(tree.find_path(&["c", "d", "e"]).unwrap()),
            vec![
                Frame::function("c"),
                Frame::function("d"),
                Frame::function("e")
            ]
        );
    }

    #[test]
    fn test_empty_histogram_is_error() {
        let result = TreeBuilder::default().build(&CollapsedStacks::new());
        assert!(matches!(result, Err(TreeError::Empty)));
    }
}
