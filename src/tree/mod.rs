//! Weighted call tree.
//!
//! This module handles:
//! - Building the tree from collapsed stacks (with depth limits)
//! - Pruning insignificant branches
//! - Shape statistics and nested JSON export

pub mod builder;
pub mod node;
pub mod stats;

// Re-export main types
pub use builder::{BuildOptions, TreeBuilder};
pub use node::{FlameNode, FlameTree, NodeId};
pub use stats::TreeStats;
