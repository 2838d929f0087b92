//! Concurrent path histogram.
//!
//! Existing paths are bumped under a shared shard lock with an atomic add.
//! Only a path seen for the first time takes the shard's write lock.

use crate::aggregator::{finalize, CollapseOptions, CollapsedStacks};
use crate::parser::{Frame, StackSample};
use crate::utils::error::CollapseError;
use dashmap::DashMap;
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe accumulation of path weights
#[derive(Debug, Default)]
pub struct ConcurrentStacks<'a> {
    map: DashMap<Vec<Frame<'a>>, AtomicU64, FxBuildHasher>,
}

impl<'a> ConcurrentStacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` under `path`; callable from any thread
    pub fn add(&self, path: &[Frame<'a>], weight: u64) {
        if let Some(total) = self.map.get(path) {
            total.fetch_add(weight, Ordering::Relaxed);
            return;
        }

        self.map
            .entry(path.to_vec())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(weight, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drain into the histogram type the tree builder consumes
    pub fn into_collapsed(self) -> CollapsedStacks<'a> {
        let mut stacks = CollapsedStacks::with_capacity(self.map.len());
        for (path, total) in self.map {
            stacks.add_owned(path, total.into_inner());
        }
        stacks
    }
}

/// Collapse samples on the rayon pool
///
/// Produces the same histogram as [`crate::aggregator::collapse`].
///
/// # Errors
/// * `CollapseError::NoSamples` - `samples` is empty
/// * `CollapseError::EmptyHistogram` - nothing survived filtering
pub fn collapse_concurrent<'a>(
    samples: &[StackSample<'a>],
    options: &CollapseOptions,
) -> Result<CollapsedStacks<'a>, CollapseError> {
    if samples.is_empty() {
        return Err(CollapseError::NoSamples);
    }

    debug!("Collapsing {} samples concurrently", samples.len());

    let stacks = ConcurrentStacks::new();
    samples
        .par_iter()
        .filter(|sample| sample.is_valid())
        .for_each(|sample| stacks.add(&sample.frames, sample.weight));

    finalize(stacks.into_collapsed(), options)
}
