//! Aggregation of stack samples into collapsed stacks.
//!
//! This module transforms parsed samples into:
//! - A path histogram (exact call path → summed weight)
//! - Filtered histograms (minimum count, excluded frames)

pub mod collapse;
pub mod filter;

// Re-export main types and functions
pub use collapse::{collapse, finalize, CollapsedStacks};
pub use filter::CollapseOptions;
