//! Tree statistics and nested JSON export.

use super::node::{FlameTree, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Shape summary of a [`FlameTree`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Nodes including the root
    pub total_nodes: usize,

    pub leaf_nodes: usize,

    /// Deepest node depth, the root being depth 0
    pub max_depth: usize,

    /// Sum of every node's self weight (equals the root total)
    pub total_self_weight: u64,

    /// Node count per depth, index 0 is the root
    pub nodes_per_depth: Vec<usize>,
}

impl FlameTree<'_> {
    /// Walk the tree once and summarize its shape
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(NodeId::ROOT, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);

            stats.total_nodes += 1;
            stats.total_self_weight += node.self_weight();
            stats.max_depth = stats.max_depth.max(depth);

            if stats.nodes_per_depth.len() <= depth {
                stats.nodes_per_depth.resize(depth + 1, 0);
            }
            stats.nodes_per_depth[depth] += 1;

            if node.is_leaf() {
                stats.leaf_nodes += 1;
            }
            stack.extend(node.children().map(|child| (child, depth + 1)));
        }

        stats
    }

    /// Nested `{name, value, children}` document of the whole tree
    ///
    /// Leaves carry no `children` key. Built bottom-up over the arena, so no
    /// recursion is involved.
    pub fn to_json_value(&self) -> Value {
        let mut built: Vec<Option<Value>> = vec![None; self.len()];

        for index in (0..self.len()).rev() {
            let node = self.node(NodeId(index));
            let name = match node.frame() {
                Some(frame) => frame.display_name().into_owned(),
                None => "root".to_string(),
            };

            let mut value = json!({
                "name": name,
                "value": node.total_weight(),
            });

            if !node.is_leaf() {
                let children: Vec<Value> = node
                    .children()
                    .filter_map(|child| built[child.index()].take())
                    .collect();
                value["children"] = Value::Array(children);
            }

            built[index] = Some(value);
        }

        built
            .into_iter()
            .next()
            .flatten()
            .unwrap_or(Value::Null)
    }
}
