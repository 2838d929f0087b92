//! Post-pass filters over a finished histogram.
//!
//! These never change how samples collapse; they only drop whole paths
//! once every weight has been accumulated.

use super::collapse::CollapsedStacks;
use log::debug;

/// Filters applied after collapsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseOptions {
    /// Paths whose accumulated weight is below this are dropped
    pub min_count: u64,

    /// Paths containing a frame whose name contains any of these are dropped
    pub exclude_patterns: Vec<String>,
}

impl Default for CollapseOptions {
    fn default() -> Self {
        Self {
            min_count: 1,
            exclude_patterns: Vec::new(),
        }
    }
}

impl CollapseOptions {
    fn is_noop(&self) -> bool {
        self.min_count <= 1 && self.exclude_patterns.iter().all(String::is_empty)
    }
}

/// Drop paths rejected by `options`
///
/// **Private** - called by `collapse::finalize`
pub(crate) fn apply_filters(stacks: &mut CollapsedStacks<'_>, options: &CollapseOptions) {
    if options.is_noop() {
        return;
    }

    let patterns: Vec<&str> = options
        .exclude_patterns
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();

    let before = stacks.len();
    stacks.retain(|path, weight| {
        weight >= options.min_count
            && !path
                .iter()
                .any(|frame| patterns.iter().any(|p| frame.name().contains(p)))
    });

    debug!(
        "Filters removed {} of {} paths",
        before - stacks.len(),
        before
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Frame;

    fn stacks() -> CollapsedStacks<'static> {
        let mut stacks = CollapsedStacks::new();
        stacks.add(&[Frame::function("main"), Frame::function("foo")], 5);
        stacks.add(&[Frame::function("main"), Frame::function("__lll_lock")], 7);
        stacks.add(&[Frame::function("main"), Frame::function("bar")], 1);
        stacks
    }

    #[test]
    fn test_min_count() {
        let mut stacks = stacks();
        let options = CollapseOptions {
            min_count: 2,
            ..Default::default()
        };
        apply_filters(&mut stacks, &options);

        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks.total_weight(), 12);
    }

    #[test]
    fn test_exclude_patterns_match_substrings() {
        let mut stacks = stacks();
        let options = CollapseOptions {
            exclude_patterns: vec!["lock".to_string(), String::new()],
            ..Default::default()
        };
        apply_filters(&mut stacks, &options);

        assert_eq!(stacks.len(), 2);
        assert_eq!(
            stacks.get(&[Frame::function("main"), Frame::function("__lll_lock")]),
            None
        );
    }

    #[test]
    fn test_defaults_keep_everything() {
        let mut stacks = stacks();
        apply_filters(&mut stacks, &CollapseOptions::default());
        assert_eq!(stacks.len(), 3);
    }
}
