//! Split the input into line ranges and parse them concurrently.
//!
//! A sample is a run of non-terminator lines. The worker whose range holds
//! a run's first line parses the whole run, reading past its range end if
//! needed. A worker whose range starts inside a run skips to the run's end.
//! Every sample is therefore parsed exactly once, from its true start.

use crate::parser::{Dialect, StackSample};
use log::debug;
use rayon::prelude::*;
use std::ops::Range;

/// Trimmed lines of the input, addressable by index
#[derive(Debug, Clone, Default)]
pub struct LineIndex<'a> {
    lines: Vec<&'a str>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().map(str::trim).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }
}

/// Contiguous line ranges, one per worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    ranges: Vec<Range<usize>>,
}

impl PartitionPlan {
    /// Plan `total` lines across workers
    ///
    /// Uses `min(max_workers, ceil(total / min_lines_per_worker))` workers,
    /// at least one. `max_workers` defaults to the hardware parallelism.
    /// The last range takes the remainder.
    pub fn for_lines(total: usize, min_lines_per_worker: usize, max_workers: Option<usize>) -> Self {
        let hardware = max_workers.unwrap_or_else(available_workers).max(1);
        let wanted = total.div_ceil(min_lines_per_worker.max(1));
        let workers = hardware.min(wanted).max(1);
        let chunk = total / workers;

        let ranges = (0..workers)
            .map(|worker| {
                let start = worker * chunk;
                let end = if worker + 1 == workers {
                    total
                } else {
                    start + chunk
                };
                start..end
            })
            .collect();

        Self { ranges }
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn worker_count(&self) -> usize {
        self.ranges.len()
    }
}

fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Parse every range of `plan` on the rayon pool and concatenate the results
///
/// **Public** - partitioned counterpart of `parser::read_samples`
pub fn parse_partitioned<'a>(
    index: &LineIndex<'a>,
    plan: &PartitionPlan,
    dialect: Dialect,
) -> Vec<StackSample<'a>> {
    let per_worker: Vec<Vec<StackSample<'a>>> = plan
        .ranges()
        .par_iter()
        .map(|range| parse_range(index.lines(), range.clone(), dialect))
        .collect();

    per_worker.into_iter().flatten().collect()
}

/// Parse the samples whose first line lies in `range`
///
/// **Private** - one worker's share of `parse_partitioned`
pub(crate) fn parse_range<'a>(
    lines: &[&'a str],
    range: Range<usize>,
    dialect: Dialect,
) -> Vec<StackSample<'a>> {
    let end = range.end.min(lines.len());
    let mut start = range.start.min(end);

    // Started inside a run: it belongs to an earlier range
    if start > 0 && !dialect.is_terminator(lines[start - 1]) {
        while start < end && !dialect.is_terminator(lines[start]) {
            start += 1;
        }
    }

    let mut reader = dialect.reader();
    let mut samples = Vec::new();
    if start == end {
        return samples;
    }

    let mut index = start;
    while index < end {
        reader.feed(lines[index], &mut samples);
        index += 1;
    }

    // Complete a run that continues past the range end
    while index < lines.len() && !dialect.is_terminator(lines[index - 1]) {
        reader.feed(lines[index], &mut samples);
        index += 1;
    }

    if index == lines.len() {
        reader.finish(&mut samples);
    }

    debug!(
        "Worker {:?} parsed lines {}..{} into {} samples",
        range,
        start,
        index,
        samples.len()
    );

    samples
}
