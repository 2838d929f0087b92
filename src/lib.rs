//! flamefold
//!
//! Folds sampled call stacks into a weighted call tree and lays it out as
//! a flame graph.
//!
//! This crate provides the core implementation for the `flamefold` CLI
//! tool: dialect detection, stack parsing, path collapsing, tree building
//! with pruning, layout and coloring, and partitioned parallel parsing for
//! large inputs.
//!
//! ## Getting Started
//!
//! ```bash
//! perf script | flamefold generate - -o flamegraph.svg
//! flamefold collapse stacks.txt -o stacks.folded
//! ```
//!
//! From code, [`commands::generate`] runs the whole pipeline.

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parallel;
pub mod parser;
pub mod tree;
pub mod utils;
