//! Collapse stack samples into a path histogram.
//!
//! Identical call paths are merged and their weights summed.
//! Folded format: "root;child;leaf weight"
//!
//! Example: "main;foo;bar 3"
//! This means: the path main → foo → bar was observed with total weight 3.

use super::filter::{apply_filters, CollapseOptions};
use crate::parser::{Frame, StackSample};
use crate::utils::error::CollapseError;
use log::debug;
use rustc_hash::FxHashMap;

/// Histogram from exact call path to accumulated weight
///
/// **Public** - input of the tree builder and the folded writer
///
/// Keys are compared element-wise and order-sensitively. Lookups take a
/// `&[Frame]`, so adding to an existing path never allocates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapsedStacks<'a> {
    stacks: FxHashMap<Vec<Frame<'a>>, u64>,
}

impl<'a> CollapsedStacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stacks: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Add `weight` under `path`
    pub fn add(&mut self, path: &[Frame<'a>], weight: u64) {
        match self.stacks.get_mut(path) {
            Some(total) => *total += weight,
            None => {
                self.stacks.insert(path.to_vec(), weight);
            }
        }
    }

    /// Add `weight` under an owned path, reusing its allocation for new keys
    pub fn add_owned(&mut self, path: Vec<Frame<'a>>, weight: u64) {
        *self.stacks.entry(path).or_insert(0) += weight;
    }

    pub fn get(&self, path: &[Frame<'a>]) -> Option<u64> {
        self.stacks.get(path).copied()
    }

    /// Number of unique paths
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Sum of all path weights
    pub fn total_weight(&self) -> u64 {
        self.stacks.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Frame<'a>], u64)> + '_ {
        self.stacks
            .iter()
            .map(|(path, weight)| (path.as_slice(), *weight))
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&[Frame<'a>], u64) -> bool) {
        self.stacks.retain(|path, weight| keep(path, *weight));
    }

    /// Render every path as a folded line, sorted for stable output
    ///
    /// Module-only frames are written with their display brackets.
    pub fn folded_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .iter()
            .map(|(path, weight)| {
                let labels: Vec<_> = path.iter().map(Frame::display_name).collect();
                format!("{} {}", labels.join(";"), weight)
            })
            .collect();

        lines.sort();
        lines
    }
}

/// Collapse samples into a histogram
///
/// **Public** - main entry point for the sequential path
///
/// # Arguments
/// * `samples` - Parsed samples, frames in root→leaf order
/// * `options` - Post-pass filters applied to the finished histogram
///
/// # Errors
/// * `CollapseError::NoSamples` - `samples` is empty
/// * `CollapseError::EmptyHistogram` - nothing survived filtering
pub fn collapse<'a>(
    samples: &[StackSample<'a>],
    options: &CollapseOptions,
) -> Result<CollapsedStacks<'a>, CollapseError> {
    if samples.is_empty() {
        return Err(CollapseError::NoSamples);
    }

    debug!("Collapsing {} samples", samples.len());

    let mut stacks = CollapsedStacks::with_capacity(samples.len() / 4 + 1);
    for sample in samples.iter().filter(|sample| sample.is_valid()) {
        stacks.add(&sample.frames, sample.weight);
    }

    finalize(stacks, options)
}

/// Apply the post-pass filters and reject an empty result
///
/// Shared by the sequential and concurrent collapse paths.
pub fn finalize<'a>(
    mut stacks: CollapsedStacks<'a>,
    options: &CollapseOptions,
) -> Result<CollapsedStacks<'a>, CollapseError> {
    apply_filters(&mut stacks, options);

    if stacks.is_empty() {
        return Err(CollapseError::EmptyHistogram);
    }

    debug!("Built {} unique collapsed stacks", stacks.len());
    Ok(stacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample<'a>(names: &[&'a str], weight: u64) -> StackSample<'a> {
        StackSample::new(names.iter().copied().map(Frame::function).collect(), weight)
    }

    fn path<'a>(names: &[&'a str]) -> Vec<Frame<'a>> {
        names.iter().copied().map(Frame::function).collect()
    }

    #[test]
    fn test_identical_paths_are_summed() {
        let samples = vec![
            sample(&["main", "foo", "bar"], 1),
            sample(&["main", "foo", "baz"], 1),
            sample(&["main", "foo", "bar"], 2),
        ];

        let stacks = collapse(&samples, &CollapseOptions::default()).unwrap();

        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks.get(&path(&["main", "foo", "bar"])), Some(3));
        assert_eq!(stacks.get(&path(&["main", "foo", "baz"])), Some(1));
        assert_eq!(stacks.total_weight(), 4);
    }

    #[test]
    fn test_paths_are_order_sensitive() {
        let samples = vec![sample(&["a", "b"], 1), sample(&["b", "a"], 1)];
        let stacks = collapse(&samples, &CollapseOptions::default()).unwrap();

        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks.get(&path(&["a", "b"])), Some(1));
    }

    #[test]
    fn test_function_and_module_frames_stay_distinct() {
        let samples = vec![
            StackSample::new(vec![Frame::function("libc.so")], 1),
            StackSample::new(vec![Frame::module("libc.so")], 1),
        ];
        let stacks = collapse(&samples, &CollapseOptions::default()).unwrap();
        assert_eq!(stacks.len(), 2);
    }

    #[test]
    fn test_empty_input_is_error() {
        let result = collapse(&[], &CollapseOptions::default());
        assert!(matches!(result, Err(CollapseError::NoSamples)));
    }

    #[test]
    fn test_everything_filtered_is_error() {
        let samples = vec![sample(&["main"], 1)];
        let options = CollapseOptions {
            min_count: 5,
            ..Default::default()
        };

        let result = collapse(&samples, &options);
        assert!(matches!(result, Err(CollapseError::EmptyHistogram)));
    }

    #[test]
    fn test_folded_lines_are_sorted() {
        let samples = vec![
            sample(&["main", "zeta"], 2),
            StackSample::new(vec![Frame::function("main"), Frame::module("libc.so.6")], 1),
            StackSample::new(vec![Frame::module("[kernel.kallsyms]")], 4),
        ];
        let stacks = collapse(&samples, &CollapseOptions::default()).unwrap();

        assert_eq!(
            stacks.folded_lines(),
            vec![
                "[kernel.kallsyms] 4".to_string(),
                "main;[libc.so.6] 1".to_string(),
                "main;zeta 2".to_string(),
            ]
        );
    }
}
